//! Posture monitoring library for real-time webcam posture tracking.
//!
//! This library watches a seated user through a webcam and tells them when
//! they have been slouching for too long:
//! - ONNX Runtime runs a body landmark model on each frame
//! - `OpenCV` handles capture, preprocessing and the on-screen overlay
//! - A small per-frame core turns landmarks into a good/bad verdict and alerts
//!
//! The per-frame pipeline consists of:
//! 1. Pose estimation to get 33 normalized body landmarks
//! 2. Posture metrics (neck/torso inclination, shoulder level, closeness)
//! 3. Classification against a calibrated baseline with adjustable tolerance
//! 4. Streak accounting and rate-limited alerts
//!
//! A Pomodoro timer runs alongside and can advance itself when the user
//! stands up or sits down.
//!
//! # Examples
//!
//! ## Classifying Landmarks
//!
//! ```no_run
//! use posture_monitor::{
//!     landmarks::{Landmark, LandmarkCollection},
//!     metrics::calculate_metrics,
//!     tracker::{PostureTracker, TrackerSettings},
//! };
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = PostureTracker::new(TrackerSettings::default())?;
//!
//! // Landmarks normally come from a pose engine
//! let landmarks = LandmarkCollection::new(vec![Landmark::new(0.5, 0.5, -0.6); 33]);
//! let metrics = calculate_metrics(Some(&landmarks), 640, 480);
//!
//! if let Some(report) = tracker.tick(metrics.as_ref(), Duration::from_millis(100)) {
//!     println!("{:?}, bad for {:.1}s", report.verdict, report.bad_time);
//!     if report.alert {
//!         println!("Sit up straight!");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pomodoro Timer
//!
//! ```no_run
//! use posture_monitor::timer::{PhaseDurations, PomodoroTimer};
//! use posture_monitor::utils::format_hms;
//! use std::time::Duration;
//!
//! let mut timer = PomodoroTimer::new(PhaseDurations::default());
//! timer.start(Duration::ZERO);
//!
//! let remaining = timer.tick(Duration::from_secs(90));
//! println!("{} left", format_hms(remaining));
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use posture_monitor::{
//!     alert::LogAlert,
//!     app::PostureSession,
//!     clock::{Clock, SystemClock},
//!     config::Config,
//!     pose_engine::{OnnxPoseEngine, PoseEngine},
//! };
//! use opencv::{videoio, core::Mat, highgui, prelude::*};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut engine = OnnxPoseEngine::new(&config.model.pose_landmarks)?;
//! let mut session = PostureSession::new(&config, Box::new(LogAlert::default()))?;
//! let clock = SystemClock::new();
//!
//! let mut cap = videoio::VideoCapture::new(0, videoio::CAP_ANY)?;
//! let mut frame = Mat::default();
//!
//! loop {
//!     if !cap.read(&mut frame)? {
//!         break;
//!     }
//!
//!     let landmarks = engine.process(&frame)?;
//!     let outcome = session.process(landmarks.as_ref(), frame.cols(), frame.rows(), clock.now());
//!     if let Some(report) = outcome.report {
//!         println!("{:?}", report.verdict);
//!     }
//!
//!     highgui::imshow("Posture", &frame)?;
//!     if highgui::wait_key(1)? == b'q' as i32 {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Body landmark names, values and pixel lookup
pub mod landmarks;

/// Distance and inclination primitives
pub mod geometry;

/// Posture metrics computed from landmarks
pub mod metrics;

/// Baseline, tolerance and per-frame verdicts
pub mod classifier;

/// Good/bad streak accounting and alert rate limiting
pub mod tracker;

/// Standing/sitting and hand-raise detection
pub mod standing;

/// Pomodoro work/break timer
pub mod timer;

/// Injectable time source
pub mod clock;

/// Alert delivery
pub mod alert;

/// Pose estimation engines
pub mod pose_engine;

/// Utility functions for numeric conversion and formatting
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
