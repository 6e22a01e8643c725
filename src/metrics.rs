//! Per-frame posture measurements derived from body landmarks.

use crate::{
    geometry::{distance, inclination_angle},
    landmarks::{get_landmark_with_depth, LandmarkCollection, PixelPoint, PoseLandmark},
    Error, Result,
};
use log::debug;

/// Landmarks every metrics snapshot depends on
pub const REQUIRED_LANDMARKS: [PoseLandmark; 4] = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftEar,
    PoseLandmark::LeftHip,
];

/// Geometric posture measurements for one frame
///
/// A snapshot is either complete or absent; there are no partially filled
/// snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PostureMetrics {
    /// Left shoulder in pixels
    pub left_shoulder: PixelPoint,
    /// Right shoulder in pixels
    pub right_shoulder: PixelPoint,
    /// Left ear in pixels
    pub left_ear: PixelPoint,
    /// Left hip in pixels
    pub left_hip: PixelPoint,
    /// Pixel distance between the shoulders
    pub shoulder_distance: f64,
    /// Shoulder-to-ear angle from vertical, whole degrees
    pub neck_inclination: f64,
    /// Hip-to-shoulder angle from vertical, whole degrees
    pub torso_inclination: f64,
    /// Vertical pixel difference between the shoulders
    pub shoulder_level: f64,
    /// Mean absolute depth of shoulders and ear, in pixels
    pub closeness: f64,
}

/// Compute a metrics snapshot, or `None` when any required landmark is
/// missing or the geometry is degenerate
#[must_use]
pub fn calculate_metrics(
    landmarks: Option<&LandmarkCollection>,
    width: i32,
    height: i32,
) -> Option<PostureMetrics> {
    let landmarks = landmarks?;
    match try_calculate_metrics(landmarks, width, height) {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            debug!("Skipping posture metrics for this frame: {e}");
            None
        }
    }
}

/// Compute a metrics snapshot, reporting why it could not be produced
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when a required landmark cannot be read and
/// [`Error::DegenerateGeometry`] when an inclination angle is undefined.
pub fn try_calculate_metrics(landmarks: &LandmarkCollection, width: i32, height: i32) -> Result<PostureMetrics> {
    let lookup = |name: PoseLandmark| {
        get_landmark_with_depth(Some(landmarks), name, width, height)
            .ok_or_else(|| Error::InvalidInput(format!("landmark {name} unavailable")))
    };

    let (l_shoulder, l_shoulder_z) = lookup(PoseLandmark::LeftShoulder)?;
    let (r_shoulder, r_shoulder_z) = lookup(PoseLandmark::RightShoulder)?;
    let (l_ear, l_ear_z) = lookup(PoseLandmark::LeftEar)?;
    let (l_hip, _) = lookup(PoseLandmark::LeftHip)?;

    let shoulder_distance = distance(
        f64::from(l_shoulder.x),
        f64::from(l_shoulder.y),
        f64::from(r_shoulder.x),
        f64::from(r_shoulder.y),
    );
    let neck_inclination = inclination_angle(
        f64::from(l_shoulder.x),
        f64::from(l_shoulder.y),
        f64::from(l_ear.x),
        f64::from(l_ear.y),
    )?;
    let torso_inclination = inclination_angle(
        f64::from(l_hip.x),
        f64::from(l_hip.y),
        f64::from(l_shoulder.x),
        f64::from(l_shoulder.y),
    )?;
    let shoulder_level = (f64::from(l_shoulder.y) - f64::from(r_shoulder.y)).abs();
    let closeness = ((f64::from(l_shoulder_z) + f64::from(r_shoulder_z) + f64::from(l_ear_z)) / 3.0).abs();

    Ok(PostureMetrics {
        left_shoulder: l_shoulder,
        right_shoulder: r_shoulder,
        left_ear: l_ear,
        left_hip: l_hip,
        shoulder_distance,
        neck_inclination,
        torso_inclination,
        shoulder_level,
        closeness,
    })
}
