//! Constants used throughout the application

/// Default frames per second requested from the camera
pub const DEFAULT_FPS: f64 = 10.0;

/// Default capture resolution
pub const DEFAULT_FRAME_WIDTH: i32 = 640;
pub const DEFAULT_FRAME_HEIGHT: i32 = 480;

/// Number of landmarks produced by the pose engine
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Default baseline posture values
pub const DEFAULT_BASELINE_OFFSET: f64 = 260.0;
pub const DEFAULT_BASELINE_NECK_INCLINATION: f64 = 30.0;
pub const DEFAULT_BASELINE_TORSO_INCLINATION: f64 = 4.0;
pub const DEFAULT_BASELINE_SHOULDER_DISTANCE: f64 = 270.0;
pub const DEFAULT_BASELINE_CLOSENESS: f64 = 420.0;
pub const DEFAULT_BASELINE_SHOULDER_LEVEL: f64 = 10.0;

/// Tolerance ("easiness") bounds
pub const TOLERANCE_MIN: u8 = 0;
pub const TOLERANCE_MAX: u8 = 10;
pub const DEFAULT_TOLERANCE: u8 = 5;

/// Closeness may drop this many pixels below baseline per tolerance step
pub const CLOSENESS_BAND_BELOW: f64 = 20.0;

/// Closeness may rise this many pixels above baseline per tolerance step
pub const CLOSENESS_BAND_ABOVE: f64 = 50.0;

/// Neck band half-width in degrees per tolerance step
pub const NECK_BAND_PER_TOLERANCE: f64 = 1.0;

/// Neck band half-width in degrees at zero tolerance
pub const NECK_BAND_MARGIN: f64 = 5.0;

/// Shoulder level band half-width in pixels per tolerance step
pub const SHOULDER_LEVEL_BAND_PER_TOLERANCE: f64 = 5.0;

/// Seconds of continuous bad posture before an alert
pub const DEFAULT_POSTURE_WARNING_SECS: f64 = 5.0;

/// Minimum seconds between two alerts
pub const DEFAULT_ALERT_INTERVAL_SECS: f64 = 5.0;

/// Upper bound for the warning time and alert interval
pub const MAX_POSTURE_SECS: f64 = 86_400.0;

/// Shoulder-to-eye gap (normalized) at or below which the user counts as standing
pub const DEFAULT_STANDING_THRESHOLD: f64 = 0.08;

/// Average eye height (normalized) below which the face is treated as out of frame
pub const EYE_VISIBILITY_FLOOR: f64 = 0.002;

/// Pomodoro durations in minutes
pub const DEFAULT_WORK_MINUTES: u64 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u64 = 3;
pub const DEFAULT_LONG_BREAK_MINUTES: u64 = 35;

/// Longest configurable Pomodoro phase, in minutes
pub const MAX_PHASE_MINUTES: u64 = 24 * 60;

/// Consecutive failed camera reads before the camera counts as lost
pub const MAX_FAILED_FRAME_READS: u32 = 50;

/// Pause between camera read retries
pub const FRAME_RETRY_DELAY_MS: u64 = 20;

/// Pose model input size
pub const DEFAULT_POSE_INPUT_SIZE: i32 = 256;

/// Minimum pose presence score for a detection to count
pub const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

/// Default alert volume (0.0 - 1.0)
pub const DEFAULT_ALERT_VOLUME: f32 = 0.2;

/// Length of the reference line drawn above the hip in the overlay
pub const VERTICAL_REFERENCE_LENGTH: i32 = 100;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
