//! Body landmark types and per-frame landmark lookup.
//!
//! The pose engine reports 33 body landmarks per frame in normalized image
//! coordinates (origin top-left, `x` and `y` roughly in `[0, 1]`, `z` a relative
//! depth on the same scale as `x`). A [`LandmarkCollection`] lives for exactly one
//! frame; nothing in this crate keeps one across ticks.

use crate::utils::safe_cast::normalized_to_pixel;
use std::fmt;

/// Named body landmarks in pose engine index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Position of this landmark in the engine output
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case name as used in debug dumps
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "NOSE",
            Self::LeftEyeInner => "LEFT_EYE_INNER",
            Self::LeftEye => "LEFT_EYE",
            Self::LeftEyeOuter => "LEFT_EYE_OUTER",
            Self::RightEyeInner => "RIGHT_EYE_INNER",
            Self::RightEye => "RIGHT_EYE",
            Self::RightEyeOuter => "RIGHT_EYE_OUTER",
            Self::LeftEar => "LEFT_EAR",
            Self::RightEar => "RIGHT_EAR",
            Self::MouthLeft => "MOUTH_LEFT",
            Self::MouthRight => "MOUTH_RIGHT",
            Self::LeftShoulder => "LEFT_SHOULDER",
            Self::RightShoulder => "RIGHT_SHOULDER",
            Self::LeftElbow => "LEFT_ELBOW",
            Self::RightElbow => "RIGHT_ELBOW",
            Self::LeftWrist => "LEFT_WRIST",
            Self::RightWrist => "RIGHT_WRIST",
            Self::LeftPinky => "LEFT_PINKY",
            Self::RightPinky => "RIGHT_PINKY",
            Self::LeftIndex => "LEFT_INDEX",
            Self::RightIndex => "RIGHT_INDEX",
            Self::LeftThumb => "LEFT_THUMB",
            Self::RightThumb => "RIGHT_THUMB",
            Self::LeftHip => "LEFT_HIP",
            Self::RightHip => "RIGHT_HIP",
            Self::LeftKnee => "LEFT_KNEE",
            Self::RightKnee => "RIGHT_KNEE",
            Self::LeftAnkle => "LEFT_ANKLE",
            Self::RightAnkle => "RIGHT_ANKLE",
            Self::LeftHeel => "LEFT_HEEL",
            Self::RightHeel => "RIGHT_HEEL",
            Self::LeftFootIndex => "LEFT_FOOT_INDEX",
            Self::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

impl fmt::Display for PoseLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge, 1 = right edge
    pub x: f32,
    /// Vertical position, 0 = top edge, 1 = bottom edge
    pub y: f32,
    /// Relative depth, same scale as `x`; smaller is closer to the camera
    pub z: f32,
    /// Visibility score (0.0 - 1.0)
    pub visibility: f32,
}

impl Landmark {
    /// Create a fully visible landmark
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
        }
    }
}

/// All landmarks reported for one detected body in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkCollection {
    landmarks: Vec<Landmark>,
}

impl LandmarkCollection {
    /// Wrap raw engine output
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Look up a landmark; `None` when the engine output is too short to contain it
    #[must_use]
    pub fn get(&self, name: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(name.index())
    }

    /// Number of landmarks in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// True when the engine produced no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Human-readable `NAME x: .., y: .., z: ..` lines for the requested landmarks
    ///
    /// Missing landmarks are skipped.
    #[must_use]
    pub fn describe(&self, names: &[PoseLandmark]) -> Vec<String> {
        names
            .iter()
            .filter_map(|&name| {
                self.get(name)
                    .map(|lm| format!("{name} x: {:.2}, y: {:.2}, z: {:.2}", lm.x, lm.y, lm.z))
            })
            .collect()
    }
}

impl From<Vec<Landmark>> for LandmarkCollection {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

/// A landmark position in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelPoint {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl PixelPoint {
    /// Create a pixel point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel-space position of a named landmark
///
/// Returns `None` when no body was detected, when the collection does not
/// contain the landmark, or when its coordinates cannot be mapped to pixels.
#[must_use]
pub fn get_landmark(
    collection: Option<&LandmarkCollection>,
    name: PoseLandmark,
    width: i32,
    height: i32,
) -> Option<PixelPoint> {
    get_landmark_with_depth(collection, name, width, height).map(|(point, _)| point)
}

/// Pixel-space position and depth of a named landmark
///
/// Depth is scaled by image width, matching the engine's convention that `z`
/// shares the horizontal scale.
#[must_use]
pub fn get_landmark_with_depth(
    collection: Option<&LandmarkCollection>,
    name: PoseLandmark,
    width: i32,
    height: i32,
) -> Option<(PixelPoint, i32)> {
    let landmark = collection?.get(name)?;
    let x = normalized_to_pixel(landmark.x, width).ok()?;
    let y = normalized_to_pixel(landmark.y, height).ok()?;
    let z = normalized_to_pixel(landmark.z, width).ok()?;
    Some((PixelPoint::new(x, y), z))
}
