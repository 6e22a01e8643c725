//! Configuration management for the posture monitor

use crate::{
    classifier::{Baseline, Tolerance},
    constants::{
        DEFAULT_ALERT_INTERVAL_SECS, DEFAULT_ALERT_VOLUME, DEFAULT_FPS, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH,
        DEFAULT_LONG_BREAK_MINUTES, DEFAULT_POSE_INPUT_SIZE, DEFAULT_POSTURE_WARNING_SECS,
        DEFAULT_PRESENCE_THRESHOLD, DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_STANDING_THRESHOLD, DEFAULT_TOLERANCE,
        DEFAULT_WORK_MINUTES, MAX_PHASE_MINUTES, MAX_POSTURE_SECS, TOLERANCE_MAX,
    },
    timer::PhaseDurations,
    tracker::TrackerSettings,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera configuration
    pub camera: CameraConfig,

    /// Pose model configuration
    pub model: ModelConfig,

    /// Posture classification configuration
    pub posture: PostureConfig,

    /// Standing detection configuration
    pub standing: StandingConfig,

    /// Pomodoro timer configuration
    pub timer: TimerConfig,

    /// Alert sound configuration
    pub audio: AudioConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Camera capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index
    pub index: i32,

    /// Requested frame width
    pub width: i32,

    /// Requested frame height
    pub height: i32,

    /// Requested frame rate, also used to convert frame counts to seconds
    pub fps: f64,

    /// Mirror the image horizontally
    pub flip_x: bool,
}

/// Pose landmark model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the pose landmark ONNX model
    pub pose_landmarks: PathBuf,

    /// Square model input size in pixels
    pub input_size: i32,

    /// Minimum presence score for a detection (0.0-1.0)
    pub presence_threshold: f32,
}

/// Posture classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Seconds of continuous bad posture before alerting
    pub warning_time_secs: f64,

    /// Minimum seconds between alerts
    pub alert_interval_secs: f64,

    /// Initial tolerance (0-10)
    pub tolerance: u8,

    /// Initial baseline posture
    pub baseline: Baseline,
}

/// Standing detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingConfig {
    /// Maximum normalized shoulder-to-eye gap that still counts as standing
    pub threshold: f64,
}

/// Pomodoro timer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Work phase length in minutes
    pub work_minutes: u64,

    /// Short break length in minutes
    pub short_break_minutes: u64,

    /// Long break length in minutes
    pub long_break_minutes: u64,

    /// Advance the timer from the standing/sitting signal
    pub auto_advance: bool,
}

/// Alert sound settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Play a sound on alerts
    pub enabled: bool,

    /// Sound file to play
    pub sound_file: PathBuf,

    /// Player command; the platform default is used when unset
    pub player: Option<String>,

    /// Playback volume (0.0-1.0)
    pub volume: f32,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the camera window
    pub show_video: bool,

    /// Draw landmark annotations
    pub show_annotations: bool,

    /// Draw metric readouts
    pub show_data: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            fps: DEFAULT_FPS,
            flip_x: false,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_landmarks: PathBuf::from("assets/pose_landmarks.onnx"),
            input_size: DEFAULT_POSE_INPUT_SIZE,
            presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            warning_time_secs: DEFAULT_POSTURE_WARNING_SECS,
            alert_interval_secs: DEFAULT_ALERT_INTERVAL_SECS,
            tolerance: DEFAULT_TOLERANCE,
            baseline: Baseline::default(),
        }
    }
}

impl Default for StandingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STANDING_THRESHOLD,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            auto_advance: false,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_file: PathBuf::from("assets/buzz-notif.mp3"),
            player: None,
            volume: DEFAULT_ALERT_VOLUME,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_video: true,
            show_annotations: true,
            show_data: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Serialize configuration to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Tracker settings derived from camera and posture sections
    #[must_use]
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            fps: self.camera.fps,
            warning_time: secs_to_duration(self.posture.warning_time_secs),
            alert_interval: secs_to_duration(self.posture.alert_interval_secs),
        }
    }

    /// Initial tolerance
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.posture.tolerance)
    }

    /// Pomodoro phase lengths
    #[must_use]
    pub const fn phase_durations(&self) -> PhaseDurations {
        PhaseDurations::from_minutes(
            self.timer.work_minutes,
            self.timer.short_break_minutes,
            self.timer.long_break_minutes,
        )
    }

    /// Validate configuration values
    ///
    /// File paths are not checked here; a missing model fails at load time and
    /// a missing sound file only disables audio.
    pub fn validate(&self) -> Result<()> {
        // Camera
        if !self.camera.fps.is_finite() || self.camera.fps <= 0.0 {
            return Err(Error::ConfigError("Camera FPS must be greater than 0".to_string()));
        }
        if self.camera.width <= 0 || self.camera.height <= 0 {
            return Err(Error::ConfigError(
                "Camera width and height must be greater than 0".to_string(),
            ));
        }

        // Model
        if self.model.input_size <= 0 {
            return Err(Error::ConfigError("Model input size must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.model.presence_threshold) {
            return Err(Error::ConfigError(
                "Presence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Posture
        if self.posture.tolerance > TOLERANCE_MAX {
            return Err(Error::ConfigError(format!(
                "Tolerance must be between 0 and {TOLERANCE_MAX}"
            )));
        }
        if !(0.0..=MAX_POSTURE_SECS).contains(&self.posture.warning_time_secs) {
            return Err(Error::ConfigError(format!(
                "Warning time must be between 0 and {MAX_POSTURE_SECS} seconds"
            )));
        }
        if !(0.0..=MAX_POSTURE_SECS).contains(&self.posture.alert_interval_secs) {
            return Err(Error::ConfigError(format!(
                "Alert interval must be between 0 and {MAX_POSTURE_SECS} seconds"
            )));
        }

        // Standing
        if !(self.standing.threshold > 0.0 && self.standing.threshold < 1.0) {
            return Err(Error::ConfigError(
                "Standing threshold must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        // Timer
        let phases = [
            self.timer.work_minutes,
            self.timer.short_break_minutes,
            self.timer.long_break_minutes,
        ];
        if phases.iter().any(|minutes| !(1..=MAX_PHASE_MINUTES).contains(minutes)) {
            return Err(Error::ConfigError(format!(
                "Timer phases must be between 1 and {MAX_PHASE_MINUTES} minutes"
            )));
        }

        // Audio
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(Error::ConfigError("Volume must be between 0.0 and 1.0".to_string()));
        }

        Ok(())
    }
}

/// Non-negative seconds to a duration, saturating instead of panicking
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Posture Monitor Configuration

# Camera capture
camera:
  index: 0
  width: 640
  height: 480
  fps: 10.0
  flip_x: false

# Pose landmark model
model:
  pose_landmarks: "assets/pose_landmarks.onnx"
  input_size: 256
  presence_threshold: 0.5

# Posture classification
posture:
  warning_time_secs: 5.0
  alert_interval_secs: 5.0
  tolerance: 5
  baseline:
    offset: 260.0
    neck_inclination: 30.0
    torso_inclination: 4.0
    shoulder_distance: 270.0
    closeness: 420.0
    shoulder_level: 10.0

# Standing detection
standing:
  threshold: 0.08

# Pomodoro timer
timer:
  work_minutes: 25
  short_break_minutes: 3
  long_break_minutes: 35
  auto_advance: false

# Alert sound
audio:
  enabled: true
  sound_file: "assets/buzz-notif.mp3"
  volume: 0.2

# Display settings
display:
  show_video: true
  show_annotations: true
  show_data: true
"#;
