//! Body landmark estimation.
//!
//! The core only needs `frame -> landmarks | nothing`. [`PoseEngine`] is that
//! seam; [`OnnxPoseEngine`] runs a `BlazePose`-style landmark model with ONNX
//! Runtime.

use crate::{
    constants::{DEFAULT_POSE_INPUT_SIZE, DEFAULT_PRESENCE_THRESHOLD, NUM_POSE_LANDMARKS},
    error::Error,
    landmarks::{Landmark, LandmarkCollection},
    utils::safe_cast::usize_to_i32,
    Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Size, Vec3f, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Values per landmark in the model output: x, y, z, visibility, presence
const VALUES_PER_LANDMARK: usize = 5;

/// Source of body landmarks for a frame
pub trait PoseEngine {
    /// Estimate landmarks for one BGR frame
    ///
    /// Returns `Ok(None)` when no person was detected.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails
    fn process(&mut self, frame: &Mat) -> Result<Option<LandmarkCollection>>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Pose landmark model running on ONNX Runtime
pub struct OnnxPoseEngine {
    session: Session,
    input_size: i32,
    presence_threshold: f32,
}

impl OnnxPoseEngine {
    /// Load a pose landmark model with default input size and threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        Self::with_settings(model_path, DEFAULT_POSE_INPUT_SIZE, DEFAULT_PRESENCE_THRESHOLD)
    }

    /// Load a pose landmark model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `input_size` is not positive
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or outputs
    pub fn with_settings<P: AsRef<Path>>(model_path: P, input_size: i32, presence_threshold: f32) -> Result<Self> {
        if input_size <= 0 {
            return Err(Error::InvalidInput(format!(
                "Model input size must be positive, got {input_size}"
            )));
        }

        log::info!(
            "Initializing OnnxPoseEngine with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_engine")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size,
            presence_threshold,
        })
    }

    /// Resize, convert to RGB and scale to [0, 1] as a 1xHxWx3 tensor
    #[allow(clippy::cast_sign_loss)] // input_size is checked positive
    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = Vec::with_capacity(size * size * channels);
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                data.extend_from_slice(&pixel.0);
            }
        }

        Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::ModelDataFormatError(format!("Failed to create array: {e}")))
    }

    /// Run inference; returns every output flattened
    fn forward(&self, input: Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let mut flattened = Vec::with_capacity(outputs.len());
        for output in &outputs {
            let tensor = output.try_extract::<f32>()?;
            let view = tensor.view();
            flattened.push(view.iter().copied().collect());
        }
        Ok(flattened)
    }
}

impl PoseEngine for OnnxPoseEngine {
    fn process(&mut self, frame: &Mat) -> Result<Option<LandmarkCollection>> {
        if frame.empty() {
            return Err(Error::InvalidInput("Empty frame".to_string()));
        }

        let input = self.preprocess(frame)?;
        let outputs = self.forward(input)?;

        let landmarks = outputs
            .first()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;
        let presence = outputs.get(1).and_then(|flag| flag.first().copied());

        decode_landmarks(landmarks, presence, self.input_size, self.presence_threshold)
    }

    fn name(&self) -> &str {
        "OnnxPoseEngine"
    }
}

/// Turn raw model output into normalized landmarks
///
/// `raw` holds `x, y, z, visibility, presence` per landmark with coordinates in
/// model input pixels; visibility is a logit. `presence` is the model's
/// person-present score, when it has one.
///
/// # Errors
///
/// Returns an error if `raw` is too short for the full landmark set
#[allow(clippy::cast_precision_loss)] // input size is small
pub fn decode_landmarks(
    raw: &[f32],
    presence: Option<f32>,
    input_size: i32,
    presence_threshold: f32,
) -> Result<Option<LandmarkCollection>> {
    if let Some(score) = presence {
        if score.is_nan() || score < presence_threshold {
            log::debug!("Pose presence {score:.3} below threshold {presence_threshold:.3}");
            return Ok(None);
        }
    }

    let needed = NUM_POSE_LANDMARKS * VALUES_PER_LANDMARK;
    if raw.len() < needed {
        return Err(Error::ModelOutputError(format!(
            "Expected at least {needed} landmark values, got {}",
            raw.len()
        )));
    }

    let scale = input_size as f32;
    let landmarks = raw
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(NUM_POSE_LANDMARKS)
        .map(|values| Landmark {
            x: values[0] / scale,
            y: values[1] / scale,
            z: values[2] / scale,
            visibility: sigmoid(values[3]),
        })
        .collect();

    Ok(Some(LandmarkCollection::new(landmarks)))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::PoseLandmark;

    fn raw_output(size: f32) -> Vec<f32> {
        (0..NUM_POSE_LANDMARKS)
            .flat_map(|i| [i as f32 * 2.0, size / 2.0, -size / 4.0, 0.0, 10.0])
            .collect()
    }

    #[test]
    fn test_decode_normalizes_by_input_size() {
        let raw = raw_output(256.0);
        let landmarks = decode_landmarks(&raw, Some(0.9), 256, 0.5).unwrap().unwrap();

        assert_eq!(landmarks.len(), NUM_POSE_LANDMARKS);
        let shoulder = landmarks.get(PoseLandmark::LeftShoulder).unwrap();
        assert_eq!(shoulder.x, 22.0 / 256.0);
        assert_eq!(shoulder.y, 0.5);
        assert_eq!(shoulder.z, -0.25);
        assert_eq!(shoulder.visibility, 0.5);
    }

    #[test]
    fn test_low_presence_is_no_detection() {
        let raw = raw_output(256.0);
        assert!(decode_landmarks(&raw, Some(0.2), 256, 0.5).unwrap().is_none());
        assert!(decode_landmarks(&raw, Some(f32::NAN), 256, 0.5).unwrap().is_none());
    }

    #[test]
    fn test_missing_presence_output_is_accepted() {
        let raw = raw_output(256.0);
        assert!(decode_landmarks(&raw, None, 256, 0.5).unwrap().is_some());
    }

    #[test]
    fn test_extra_landmarks_are_ignored() {
        // Full-body models append auxiliary points after the 33 named ones
        let mut raw = raw_output(256.0);
        raw.extend(std::iter::repeat(1.0).take(6 * VALUES_PER_LANDMARK));
        let landmarks = decode_landmarks(&raw, None, 256, 0.5).unwrap().unwrap();
        assert_eq!(landmarks.len(), NUM_POSE_LANDMARKS);
    }

    #[test]
    fn test_short_output_is_error() {
        let raw = vec![0.0; 10];
        assert!(matches!(
            decode_landmarks(&raw, None, 256, 0.5),
            Err(Error::ModelOutputError(_))
        ));
    }

    #[test]
    fn test_missing_model_file() {
        assert!(OnnxPoseEngine::new("does/not/exist.onnx").is_err());
    }

    #[test]
    fn test_invalid_input_size() {
        assert!(matches!(
            OnnxPoseEngine::with_settings("assets/pose_landmarks.onnx", 0, 0.5),
            Err(Error::InvalidInput(_))
        ));
    }
}
