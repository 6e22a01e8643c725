//! Standing/sitting and hand-raise detection from raw landmarks.
//!
//! Both work on normalized coordinates, so they are independent of the
//! capture resolution.

use crate::{
    constants::{DEFAULT_STANDING_THRESHOLD, EYE_VISIBILITY_FLOOR},
    landmarks::{LandmarkCollection, PoseLandmark},
};

/// Whether the user is standing
///
/// When sitting close to a webcam the shoulders sit well below the eyes in
/// the frame; standing up pulls them toward the top edge and the gap shrinks.
/// The user counts as standing when the average shoulder height minus the
/// average eye height is at most `threshold`.
///
/// Uncertain input counts as standing: no detection, missing landmarks, or
/// eyes at the very top edge of the frame.
#[must_use]
pub fn is_standing(landmarks: Option<&LandmarkCollection>, threshold: f64) -> bool {
    let Some(landmarks) = landmarks else {
        return true;
    };

    let y = |name| landmarks.get(name).map(|lm| f64::from(lm.y));
    let (Some(left_shoulder), Some(right_shoulder), Some(left_eye), Some(right_eye)) = (
        y(PoseLandmark::LeftShoulder),
        y(PoseLandmark::RightShoulder),
        y(PoseLandmark::LeftEye),
        y(PoseLandmark::RightEye),
    ) else {
        return true;
    };

    let average_shoulder_y = (left_shoulder + right_shoulder) / 2.0;
    let average_eye_y = (left_eye + right_eye) / 2.0;

    if !average_shoulder_y.is_finite() || !average_eye_y.is_finite() || average_eye_y < EYE_VISIBILITY_FLOOR {
        return true;
    }

    average_shoulder_y - average_eye_y <= threshold
}

/// [`is_standing`] with the default threshold
#[must_use]
pub fn is_standing_default(landmarks: Option<&LandmarkCollection>) -> bool {
    is_standing(landmarks, DEFAULT_STANDING_THRESHOLD)
}

/// Whether either hand is raised: wrist above elbow above shoulder
///
/// Returns `false` when nothing was detected or a landmark is missing.
#[must_use]
pub fn is_hand_raised(landmarks: Option<&LandmarkCollection>) -> bool {
    let Some(landmarks) = landmarks else {
        return false;
    };

    let raised = |wrist, elbow, shoulder| {
        match (landmarks.get(wrist), landmarks.get(elbow), landmarks.get(shoulder)) {
            (Some(w), Some(e), Some(s)) => w.y < e.y && e.y < s.y,
            _ => false,
        }
    };

    raised(PoseLandmark::LeftWrist, PoseLandmark::LeftElbow, PoseLandmark::LeftShoulder)
        || raised(PoseLandmark::RightWrist, PoseLandmark::RightElbow, PoseLandmark::RightShoulder)
}
