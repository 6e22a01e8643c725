//! Main application module for the posture monitor.
//!
//! [`PostureSession`] owns all per-session state and runs the per-frame core
//! (metrics, classification, standing detection, timer). [`PostureApp`] wraps
//! it with the camera, the pose engine, the window and keyboard controls.

use crate::{
    alert::{AlertSink, LogAlert, SoundAlert},
    classifier::{Baseline, Tolerance, Verdict},
    clock::{Clock, SystemClock},
    config::Config,
    constants::{FRAME_RETRY_DELAY_MS, MAX_FAILED_FRAME_READS, VERTICAL_REFERENCE_LENGTH},
    error::{Error, Result},
    landmarks::{LandmarkCollection, PixelPoint},
    metrics::{calculate_metrics, PostureMetrics, REQUIRED_LANDMARKS},
    pose_engine::{OnnxPoseEngine, PoseEngine},
    standing::{is_hand_raised, is_standing},
    timer::{Phase, PomodoroTimer},
    tracker::{PostureTracker, TickReport},
    utils::{format_hms, round_tenths, safe_cast::f64_to_i32_clamp},
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};
use std::time::Duration;

const WINDOW_NAME: &str = "Posture Monitor";

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Loaded configuration file, with command-line overrides applied
    pub settings: Config,
    /// Run without a window or keyboard controls
    pub headless: bool,
    /// Log landmark values every frame
    pub debug: bool,
}

/// User commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Use the current posture as the new baseline
    Recalibrate,
    /// Make the checks more lenient
    IncreaseTolerance,
    /// Make the checks stricter
    DecreaseTolerance,
    /// Start the next timer phase if idle
    StartTimer,
    /// Pause or resume the timer
    TogglePause,
    /// Skip to the next timer phase
    NextPhase,
    /// Restart the Pomodoro cycle
    ResetTimer,
    /// Toggle standing/sitting driven timer advance
    ToggleAutoAdvance,
    /// Toggle alert sounds
    ToggleMute,
    /// Toggle the metric readouts
    ToggleData,
    /// Toggle the skeleton annotations
    ToggleAnnotations,
    /// Toggle the camera image (annotations stay on a black frame)
    ToggleVideo,
    /// Leave the frame loop
    Quit,
}

impl Command {
    /// Command bound to a `highgui::wait_key` code
    #[must_use]
    pub fn from_key(key: i32) -> Option<Self> {
        if key == 27 {
            return Some(Self::Quit);
        }
        let key = u8::try_from(key & 0xFF).ok()?;
        let command = match key.to_ascii_lowercase() {
            b'b' => Self::Recalibrate,
            b'+' | b'=' => Self::IncreaseTolerance,
            b'-' | b'_' => Self::DecreaseTolerance,
            b's' => Self::StartTimer,
            b'p' => Self::TogglePause,
            b'n' => Self::NextPhase,
            b'r' => Self::ResetTimer,
            b'a' => Self::ToggleAutoAdvance,
            b'm' => Self::ToggleMute,
            b'd' => Self::ToggleData,
            b'o' => Self::ToggleAnnotations,
            b'v' => Self::ToggleVideo,
            b'q' => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Runtime display switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToggles {
    /// Show the camera image
    pub video: bool,
    /// Draw landmarks and skeleton lines
    pub annotations: bool,
    /// Draw metric and timer text
    pub data: bool,
}

/// Everything one frame produced
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    /// Metrics snapshot, absent when detection or geometry failed
    pub metrics: Option<PostureMetrics>,
    /// Classifier report, absent when there were no metrics
    pub report: Option<TickReport>,
    /// Standing/sitting signal
    pub standing: bool,
    /// Either hand raised
    pub hand_raised: bool,
    /// Phase started by auto-advance this frame
    pub auto_started: Option<Phase>,
    /// Timer time left after this frame
    pub timer_remaining: Duration,
}

/// Per-session posture monitoring state
///
/// Driven one frame at a time with an explicit timestamp, so it can run
/// against a live camera or against recorded landmark sequences.
pub struct PostureSession {
    tracker: PostureTracker,
    timer: PomodoroTimer,
    alerts: Box<dyn AlertSink>,
    standing_threshold: f64,
    auto_advance: bool,
    muted: bool,
    display: DisplayToggles,
    current_metrics: Option<PostureMetrics>,
    last_standing: Option<bool>,
}

impl PostureSession {
    /// Build a session from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured frame rate is invalid
    pub fn new(config: &Config, alerts: Box<dyn AlertSink>) -> Result<Self> {
        let tracker = PostureTracker::with_calibration(
            config.tracker_settings(),
            config.posture.baseline,
            config.tolerance(),
        )?;

        Ok(Self {
            tracker,
            timer: PomodoroTimer::new(config.phase_durations()),
            alerts,
            standing_threshold: config.standing.threshold,
            auto_advance: config.timer.auto_advance,
            muted: !config.audio.enabled,
            display: DisplayToggles {
                video: config.display.show_video,
                annotations: config.display.show_annotations,
                data: config.display.show_data,
            },
            current_metrics: None,
            last_standing: None,
        })
    }

    /// Run the core pipeline for one frame
    pub fn process(
        &mut self,
        landmarks: Option<&LandmarkCollection>,
        width: i32,
        height: i32,
        now: Duration,
    ) -> FrameOutcome {
        let metrics = calculate_metrics(landmarks, width, height);
        self.current_metrics = metrics;

        let report = self.tracker.tick(metrics.as_ref(), now);
        if report.as_ref().is_some_and(|r| r.alert) {
            self.deliver_alert();
        }

        let standing = is_standing(landmarks, self.standing_threshold);
        if self.last_standing != Some(standing) {
            debug!("{}", if standing { "Standing" } else { "Sitting" });
            self.last_standing = Some(standing);
        }

        let auto_started = if self.auto_advance {
            self.timer.auto_advance(standing, now)
        } else {
            None
        };
        let timer_remaining = self.timer.tick(now);

        FrameOutcome {
            metrics,
            report,
            standing,
            hand_raised: is_hand_raised(landmarks),
            auto_started,
            timer_remaining,
        }
    }

    fn deliver_alert(&mut self) {
        if self.muted {
            debug!("Alert suppressed, audio muted");
            return;
        }
        if let Err(e) = self.alerts.alert() {
            warn!("{} failed: {e}", self.alerts.name());
        }
    }

    /// Apply a user command; returns `false` when the session should end
    pub fn apply(&mut self, command: Command, now: Duration) -> bool {
        match command {
            Command::Recalibrate => match self.current_metrics {
                Some(metrics) => self.tracker.set_baseline(&metrics),
                None => warn!("No posture in the current frame, baseline unchanged"),
            },
            Command::IncreaseTolerance => self.tracker.set_tolerance(self.tracker.tolerance().increased()),
            Command::DecreaseTolerance => self.tracker.set_tolerance(self.tracker.tolerance().decreased()),
            Command::StartTimer => {
                self.timer.start(now);
            }
            Command::TogglePause => {
                let paused = self.timer.toggle_pause(now);
                info!("Timer {}", if paused { "paused" } else { "running" });
            }
            Command::NextPhase => {
                self.timer.next(now);
            }
            Command::ResetTimer => {
                info!("Timer reset");
                self.timer.reset();
            }
            Command::ToggleAutoAdvance => {
                self.auto_advance = !self.auto_advance;
                info!("Auto-advance {}", on_off(self.auto_advance));
            }
            Command::ToggleMute => {
                self.muted = !self.muted;
                info!("Audio alerts {}", on_off(!self.muted));
            }
            Command::ToggleData => self.display.data = !self.display.data,
            Command::ToggleAnnotations => self.display.annotations = !self.display.annotations,
            Command::ToggleVideo => self.display.video = !self.display.video,
            Command::Quit => {
                info!("Exit requested by user");
                return false;
            }
        }
        true
    }

    /// Posture tracker
    #[must_use]
    pub const fn tracker(&self) -> &PostureTracker {
        &self.tracker
    }

    /// Pomodoro timer
    #[must_use]
    pub const fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    /// Current display switches
    #[must_use]
    pub const fn display(&self) -> DisplayToggles {
        self.display
    }

    /// Whether auto-advance is on
    #[must_use]
    pub const fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    /// Whether alert sounds are muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Tracks consecutive failed camera reads
#[derive(Debug, Clone, Copy)]
pub struct FrameReadMonitor {
    consecutive_failures: u32,
    limit: u32,
}

impl Default for FrameReadMonitor {
    fn default() -> Self {
        Self::new(MAX_FAILED_FRAME_READS)
    }
}

impl FrameReadMonitor {
    /// Give up after `limit` failures in a row
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            consecutive_failures: 0,
            limit,
        }
    }

    /// Record the outcome of one read
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] once `limit` reads in a row have failed
    pub fn record(&mut self, frame_ok: bool) -> Result<()> {
        if frame_ok {
            self.consecutive_failures = 0;
            return Ok(());
        }
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.limit {
            return Err(Error::Camera(
                "Error reading image, plug in your camera and restart the app".to_string(),
            ));
        }
        Ok(())
    }

    /// Failures since the last good frame
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

/// Main application struct
pub struct PostureApp {
    config: AppConfig,
    engine: Box<dyn PoseEngine>,
    session: PostureSession,
    video_capture: VideoCapture,
    clock: SystemClock,
}

impl PostureApp {
    /// Open the camera, load the model and prepare the session
    ///
    /// # Errors
    ///
    /// Returns an error if the camera cannot be opened or the model cannot be loaded
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing Posture Monitor");
        let settings = &config.settings;

        info!("Opening camera {}", settings.camera.index);
        let mut video_capture = VideoCapture::new(settings.camera.index, videoio::CAP_ANY)?;
        if !video_capture.is_opened()? {
            return Err(Error::Camera(format!(
                "Cannot open camera {}",
                settings.camera.index
            )));
        }
        video_capture.set(CAP_PROP_FRAME_WIDTH, f64::from(settings.camera.width))?;
        video_capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(settings.camera.height))?;
        video_capture.set(CAP_PROP_FPS, settings.camera.fps)?;
        // Low latency over smoothness
        video_capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;

        let engine = OnnxPoseEngine::with_settings(
            &settings.model.pose_landmarks,
            settings.model.input_size,
            settings.model.presence_threshold,
        )?;
        info!("Pose model loaded from {}", settings.model.pose_landmarks.display());

        let alerts: Box<dyn AlertSink> = if settings.audio.sound_file.exists() {
            let sink = match &settings.audio.player {
                Some(player) => SoundAlert::new(player.clone(), Vec::new(), &settings.audio.sound_file),
                None => SoundAlert::with_system_player(&settings.audio.sound_file, settings.audio.volume),
            };
            Box::new(sink)
        } else {
            warn!(
                "Alert sound {} not found, alerts will only be logged",
                settings.audio.sound_file.display()
            );
            Box::new(LogAlert::default())
        };

        let session = PostureSession::new(settings, alerts)?;

        if !config.headless {
            highgui::named_window(WINDOW_NAME, WINDOW_NORMAL)?;
        }

        Ok(Self {
            config,
            engine: Box::new(engine),
            session,
            video_capture,
            clock: SystemClock::new(),
        })
    }

    /// Run the main application loop
    ///
    /// # Errors
    ///
    /// Returns an error if the camera or window fails
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Entering main loop with {} ({} frames/s)",
            self.engine.name(),
            self.session.tracker().fps()
        );
        if !self.config.headless {
            info!("Keys: b baseline, +/- tolerance, s start, p pause, n next, r reset, a auto, m mute, d data, o annotations, v video, q quit");
        }

        let mut reads = FrameReadMonitor::default();
        loop {
            let mut frame = Mat::default();
            let frame_ok = self.video_capture.read(&mut frame)? && !frame.empty();
            reads.record(frame_ok)?;
            if !frame_ok {
                warn!("Failed to read frame ({} in a row), retrying...", reads.consecutive_failures());
                std::thread::sleep(Duration::from_millis(FRAME_RETRY_DELAY_MS));
                continue;
            }

            if self.config.settings.camera.flip_x {
                let temp = frame.clone();
                opencv::core::flip(&temp, &mut frame, 1)?;
            }

            let landmarks = match self.engine.process(&frame) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    warn!("Pose estimation failed: {e}");
                    None
                }
            };

            if self.config.debug {
                if let Some(landmarks) = &landmarks {
                    for line in landmarks.describe(&REQUIRED_LANDMARKS) {
                        debug!("{line}");
                    }
                }
            }

            let now = self.clock.now();
            let outcome = self.session.process(landmarks.as_ref(), frame.cols(), frame.rows(), now);

            if self.config.headless {
                continue;
            }

            self.display_results(&frame, &outcome)?;

            let key = highgui::wait_key(1)?;
            if let Some(command) = Command::from_key(key) {
                if !self.session.apply(command, self.clock.now()) {
                    break;
                }
            }
        }

        info!("Application shutting down");
        Ok(())
    }

    /// Draw the overlay and show the frame
    fn display_results(&self, frame: &Mat, outcome: &FrameOutcome) -> Result<()> {
        let display = self.session.display();
        let mut display_frame = if display.video {
            frame.clone()
        } else {
            Mat::zeros(frame.rows(), frame.cols(), frame.typ())?.to_mat()?
        };
        let height = display_frame.rows();

        if let (Some(metrics), Some(report)) = (&outcome.metrics, &outcome.report) {
            if display.annotations {
                draw_posture_indicators(&mut display_frame, metrics, verdict_color(report.verdict))?;
            }

            if display.data {
                put_line(
                    &mut display_frame,
                    &format!("Neck: {}", metrics.neck_inclination as i64),
                    Point::new(10, 30),
                    check_color(report.checks.neck),
                )?;
                put_line(
                    &mut display_frame,
                    &format!("shldr_level: {}", metrics.shoulder_level as i64),
                    Point::new(10, 60),
                    check_color(report.checks.shoulder_level),
                )?;
                put_line(
                    &mut display_frame,
                    &format!("Closeness: {}", metrics.closeness as i64),
                    Point::new(10, 90),
                    check_color(report.checks.closeness),
                )?;

                let time_text = if report.good_time > 0.0 {
                    format!("Good Posture Time: {}s", round_tenths(report.good_time))
                } else {
                    format!("Bad Posture Time: {}s", round_tenths(report.bad_time))
                };
                put_line(
                    &mut display_frame,
                    &time_text,
                    Point::new(10, height - 20),
                    verdict_color(report.verdict),
                )?;
            }
        }

        if display.data {
            self.draw_status(&mut display_frame, outcome)?;
        }

        highgui::imshow(WINDOW_NAME, &display_frame)?;
        Ok(())
    }

    /// Timer, standing and baseline readouts down the right edge
    fn draw_status(&self, image: &mut Mat, outcome: &FrameOutcome) -> Result<()> {
        let x = (image.cols() - 260).max(10);
        let timer = self.session.timer();

        let phase = timer.current_phase().map_or_else(|| "Idle".to_string(), |p| p.to_string());
        let mut lines = vec![
            format!("{phase} {}", format_hms(outcome.timer_remaining)),
            format!(
                "{}{}",
                if outcome.standing { "Standing" } else { "Sitting" },
                if outcome.hand_raised { ", hand raised" } else { "" }
            ),
        ];
        if timer.is_paused() {
            lines.push("Paused".to_string());
        }
        if timer.is_complete() {
            lines.push("Cycle complete".to_string());
        }
        if self.session.auto_advance() {
            lines.push("Auto-advance on".to_string());
        }
        if self.session.is_muted() {
            lines.push("Muted".to_string());
        }
        lines.extend(baseline_lines(self.session.tracker().baseline(), self.session.tracker().tolerance()));

        for (row, line) in (1..).zip(&lines) {
            put_line(image, line, Point::new(x, row * 25), LIGHT_GRAY)?;
        }
        Ok(())
    }
}

const RED: (f64, f64, f64) = (50.0, 50.0, 255.0);
const LIGHT_GREEN: (f64, f64, f64) = (127.0, 233.0, 100.0);
const YELLOW: (f64, f64, f64) = (0.0, 255.0, 255.0);
const PINK: (f64, f64, f64) = (255.0, 0.0, 255.0);
const LIGHT_GRAY: (f64, f64, f64) = (247.0, 245.0, 245.0);

fn scalar(color: (f64, f64, f64)) -> Scalar {
    Scalar::new(color.0, color.1, color.2, 0.0)
}

fn verdict_color(verdict: Verdict) -> (f64, f64, f64) {
    check_color(verdict.is_good())
}

fn check_color(passed: bool) -> (f64, f64, f64) {
    if passed {
        LIGHT_GREEN
    } else {
        RED
    }
}

/// Baseline readout lines, with the tolerance inserted after the torso angle
fn baseline_lines(baseline: &Baseline, tolerance: Tolerance) -> Vec<String> {
    let text = baseline.to_string();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let at = lines.len().min(3);
    lines.insert(at, format!("easiness: {tolerance}"));
    lines
}

fn put_line(image: &mut Mat, text: &str, origin: Point, color: (f64, f64, f64)) -> Result<()> {
    imgproc::put_text(
        image,
        text,
        origin,
        FONT_HERSHEY_SIMPLEX,
        0.7,
        scalar(color),
        2,
        LINE_8,
        false,
    )?;
    Ok(())
}

fn point(p: PixelPoint) -> Point {
    Point::new(p.x, p.y)
}

/// Landmark dots plus ear-shoulder, shoulder-shoulder and shoulder-hip lines
fn draw_posture_indicators(image: &mut Mat, metrics: &PostureMetrics, color: (f64, f64, f64)) -> Result<()> {
    // Keep the vertical reference dot inside the frame
    let hip_reference = PixelPoint::new(
        metrics.left_hip.x,
        f64_to_i32_clamp(
            f64::from(metrics.left_hip.y - VERTICAL_REFERENCE_LENGTH),
            0,
            (image.rows() - 1).max(0),
        ),
    );

    for (p, c) in [
        (metrics.left_shoulder, YELLOW),
        (metrics.left_ear, YELLOW),
        (metrics.right_shoulder, PINK),
        (metrics.left_hip, YELLOW),
        (hip_reference, YELLOW),
    ] {
        imgproc::circle(image, point(p), 7, scalar(c), -1, LINE_8, 0)?;
    }

    for (a, b) in [
        (metrics.left_shoulder, metrics.left_ear),
        (metrics.left_shoulder, metrics.right_shoulder),
        (metrics.left_hip, metrics.left_shoulder),
    ] {
        imgproc::line(image, point(a), point(b), scalar(color), 4, LINE_8, 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::NUM_POSE_LANDMARKS,
        landmarks::{Landmark, PoseLandmark},
    };
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingAlert(Rc<Cell<u32>>);

    impl AlertSink for CountingAlert {
        fn alert(&mut self) -> Result<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }

        fn name(&self) -> &str {
            "CountingAlert"
        }
    }

    /// Slouched, far-forward pose that fails every check at default tolerance
    fn bad_pose() -> LandmarkCollection {
        let mut landmarks = vec![Landmark::default(); NUM_POSE_LANDMARKS];
        landmarks[PoseLandmark::LeftShoulder.index()] = Landmark::new(0.5, 0.5, 0.0);
        landmarks[PoseLandmark::RightShoulder.index()] = Landmark::new(0.25, 0.75, 0.0);
        landmarks[PoseLandmark::LeftEar.index()] = Landmark::new(0.75, 0.25, 0.0);
        landmarks[PoseLandmark::LeftHip.index()] = Landmark::new(0.5, 0.875, 0.0);
        landmarks[PoseLandmark::LeftEye.index()] = Landmark::new(0.5, 0.25, 0.0);
        landmarks[PoseLandmark::RightEye.index()] = Landmark::new(0.5, 0.25, 0.0);
        LandmarkCollection::new(landmarks)
    }

    fn session(counter: &Rc<Cell<u32>>) -> PostureSession {
        PostureSession::new(&Config::default(), Box::new(CountingAlert(Rc::clone(counter)))).unwrap()
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(27), Some(Command::Quit));
        assert_eq!(Command::from_key(i32::from(b'q')), Some(Command::Quit));
        assert_eq!(Command::from_key(i32::from(b'B')), Some(Command::Recalibrate));
        assert_eq!(Command::from_key(i32::from(b'+')), Some(Command::IncreaseTolerance));
        assert_eq!(Command::from_key(-1), None);
        assert_eq!(Command::from_key(i32::from(b'z')), None);
    }

    #[test]
    fn test_no_detection_leaves_state() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);
        let outcome = session.process(None, 640, 480, Duration::ZERO);

        assert!(outcome.report.is_none());
        assert!(outcome.standing);
        assert_eq!(session.tracker().total_frames(), 0);
    }

    #[test]
    fn test_bad_posture_alerts_once_per_interval() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);
        let pose = bad_pose();

        // 10 fps for 8 seconds: bad time passes 5s at frame 51
        for frame in 0..80u64 {
            let now = Duration::from_millis(frame * 100);
            let outcome = session.process(Some(&pose), 640, 480, now);
            assert_eq!(outcome.report.unwrap().verdict, Verdict::Bad);
        }
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_muted_session_does_not_alert() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);
        session.apply(Command::ToggleMute, Duration::ZERO);
        let pose = bad_pose();

        for frame in 0..80u64 {
            session.process(Some(&pose), 640, 480, Duration::from_millis(frame * 100));
        }
        assert_eq!(counter.get(), 0);
        assert!(session.is_muted());
    }

    #[test]
    fn test_recalibrate_makes_pose_good() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);
        let pose = bad_pose();

        session.process(Some(&pose), 640, 480, Duration::ZERO);
        session.apply(Command::Recalibrate, Duration::ZERO);
        let outcome = session.process(Some(&pose), 640, 480, Duration::from_millis(100));

        assert_eq!(outcome.report.unwrap().verdict, Verdict::Good);
    }

    #[test]
    fn test_auto_advance_starts_work_when_sitting() {
        let counter = Rc::new(Cell::new(0));
        let mut config = Config::default();
        config.timer.auto_advance = true;
        let mut session = PostureSession::new(&config, Box::new(CountingAlert(Rc::clone(&counter)))).unwrap();

        let outcome = session.process(Some(&bad_pose()), 640, 480, Duration::ZERO);
        assert!(!outcome.standing);
        assert_eq!(outcome.auto_started, Some(Phase::Work));
        assert!(session.timer().is_running());
    }

    #[test]
    fn test_toggles_and_quit() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);

        session.apply(Command::ToggleData, Duration::ZERO);
        session.apply(Command::ToggleVideo, Duration::ZERO);
        assert!(!session.display().data);
        assert!(!session.display().video);
        assert!(session.display().annotations);
        assert!(!session.apply(Command::Quit, Duration::ZERO));
    }

    #[test]
    fn test_baseline_lines_include_tolerance() {
        let lines = baseline_lines(&Baseline::default(), Tolerance::new(7));
        assert_eq!(lines[3], "easiness: 7");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_recalibrate_ignores_stale_detection() {
        let counter = Rc::new(Cell::new(0));
        let mut session = session(&counter);

        session.process(Some(&bad_pose()), 640, 480, Duration::ZERO);
        session.process(None, 640, 480, Duration::from_millis(100));
        session.apply(Command::Recalibrate, Duration::from_millis(100));

        assert_eq!(*session.tracker().baseline(), Baseline::default());
    }

    #[test]
    fn test_frame_reads_give_up_after_limit() {
        let mut reads = FrameReadMonitor::new(3);
        assert!(reads.record(false).is_ok());
        assert!(reads.record(false).is_ok());
        assert!(reads.record(true).is_ok());
        assert_eq!(reads.consecutive_failures(), 0);

        assert!(reads.record(false).is_ok());
        assert!(reads.record(false).is_ok());
        assert!(matches!(reads.record(false), Err(Error::Camera(_))));
        assert_eq!(reads.consecutive_failures(), 3);
    }
}
