//! Frame-by-frame posture accumulation and alert debouncing.
//!
//! The tracker owns all posture state that survives across frames: the
//! calibrated baseline, the tolerance, consecutive good/bad frame counters and
//! the time of the last alert. Frames without a metrics snapshot leave all of
//! it untouched.

use crate::{
    classifier::{check_metrics, Baseline, MetricChecks, Tolerance, Verdict},
    constants::{DEFAULT_ALERT_INTERVAL_SECS, DEFAULT_FPS, DEFAULT_POSTURE_WARNING_SECS},
    metrics::PostureMetrics,
    Error, Result,
};
use log::{debug, info};
use std::time::Duration;

/// Consecutive frame counts for the current posture streak
///
/// At most one of the two counters is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    good_frames: u64,
    bad_frames: u64,
}

impl FrameCounters {
    /// Frames in the current good streak
    #[must_use]
    pub const fn good_frames(&self) -> u64 {
        self.good_frames
    }

    /// Frames in the current bad streak
    #[must_use]
    pub const fn bad_frames(&self) -> u64 {
        self.bad_frames
    }

    /// Extend the streak matching `verdict`, ending the other one
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Good => {
                self.good_frames += 1;
                self.bad_frames = 0;
            }
            Verdict::Bad => {
                self.bad_frames += 1;
                self.good_frames = 0;
            }
        }
    }

    /// Seconds of good posture at the given frame rate
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // frame counts stay far below 2^52
    pub fn good_time(&self, fps: f64) -> f64 {
        self.good_frames as f64 / fps
    }

    /// Seconds of bad posture at the given frame rate
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bad_time(&self, fps: f64) -> f64 {
        self.bad_frames as f64 / fps
    }
}

/// Rate limiter for posture alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertState {
    last_alert: Option<Duration>,
    interval: Duration,
}

impl AlertState {
    /// No alert has fired yet
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            last_alert: None,
            interval,
        }
    }

    /// Time of the most recent alert
    #[must_use]
    pub const fn last_alert(&self) -> Option<Duration> {
        self.last_alert
    }

    /// Minimum spacing between alerts
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Fire if the cooldown has passed; returns whether the alert fired
    pub fn try_fire(&mut self, now: Duration) -> bool {
        let ready = match self.last_alert {
            None => true,
            Some(last) => now.saturating_sub(last) > self.interval,
        };
        if ready {
            self.last_alert = Some(now);
        }
        ready
    }
}

/// Tracker parameters fixed for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Frames per second used to turn frame counts into seconds
    pub fps: f64,
    /// Continuous bad posture needed before alerting
    pub warning_time: Duration,
    /// Minimum time between alerts
    pub alert_interval: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            warning_time: Duration::from_secs_f64(DEFAULT_POSTURE_WARNING_SECS),
            alert_interval: Duration::from_secs_f64(DEFAULT_ALERT_INTERVAL_SECS),
        }
    }
}

/// Result of one classified frame, handed to rendering and audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Overall verdict
    pub verdict: Verdict,
    /// Individual band checks
    pub checks: MetricChecks,
    /// Seconds in the current good streak
    pub good_time: f64,
    /// Seconds in the current bad streak
    pub bad_time: f64,
    /// An alert should be played this frame
    pub alert: bool,
}

/// Posture session state machine
#[derive(Debug, Clone)]
pub struct PostureTracker {
    baseline: Baseline,
    tolerance: Tolerance,
    counters: FrameCounters,
    alert: AlertState,
    fps: f64,
    warning_time: f64,
    total_frames: u64,
}

impl PostureTracker {
    /// Create a tracker with the default baseline and tolerance
    ///
    /// # Errors
    ///
    /// Returns an error if the frame rate is not a positive finite number
    pub fn new(settings: TrackerSettings) -> Result<Self> {
        Self::with_calibration(settings, Baseline::default(), Tolerance::default())
    }

    /// Create a tracker with an explicit baseline and tolerance
    ///
    /// # Errors
    ///
    /// Returns an error if the frame rate is not a positive finite number
    pub fn with_calibration(settings: TrackerSettings, baseline: Baseline, tolerance: Tolerance) -> Result<Self> {
        if !settings.fps.is_finite() || settings.fps <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Frame rate must be positive, got {}",
                settings.fps
            )));
        }

        Ok(Self {
            baseline,
            tolerance,
            counters: FrameCounters::default(),
            alert: AlertState::new(settings.alert_interval),
            fps: settings.fps,
            warning_time: settings.warning_time.as_secs_f64(),
            total_frames: 0,
        })
    }

    /// Classify one frame and update the streak counters
    ///
    /// Returns `None`, leaving all state unchanged, when the frame has no
    /// metrics snapshot.
    pub fn tick(&mut self, metrics: Option<&PostureMetrics>, now: Duration) -> Option<TickReport> {
        let Some(metrics) = metrics else {
            debug!("No posture metrics this frame; counters unchanged");
            return None;
        };

        let checks = check_metrics(metrics, &self.baseline, self.tolerance);
        let verdict = checks.verdict();
        self.counters.record(verdict);
        self.total_frames += 1;

        let good_time = self.counters.good_time(self.fps);
        let bad_time = self.counters.bad_time(self.fps);

        let alert = bad_time > self.warning_time && self.alert.try_fire(now);
        if alert {
            info!("Bad posture for {bad_time:.1}s, alerting");
        }

        Some(TickReport {
            verdict,
            checks,
            good_time,
            bad_time,
            alert,
        })
    }

    /// Replace the baseline with the posture in `metrics`
    pub fn set_baseline(&mut self, metrics: &PostureMetrics) {
        self.baseline = self.baseline.recalibrated(metrics);
        info!(
            "Baseline recalibrated: neck {:.0}, closeness {:.0}, shoulder level {:.0}",
            self.baseline.neck_inclination, self.baseline.closeness, self.baseline.shoulder_level
        );
    }

    /// Change how lenient the checks are
    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        if tolerance != self.tolerance {
            info!("Tolerance changed from {} to {}", self.tolerance, tolerance);
        }
        self.tolerance = tolerance;
    }

    /// Current baseline
    #[must_use]
    pub const fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Current tolerance
    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Current streak counters
    #[must_use]
    pub const fn counters(&self) -> FrameCounters {
        self.counters
    }

    /// Alert rate limiter state
    #[must_use]
    pub const fn alert_state(&self) -> AlertState {
        self.alert
    }

    /// Frames classified so far
    #[must_use]
    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frame rate in use
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(tolerance: u8) -> PostureTracker {
        let baseline = Baseline {
            neck_inclination: 30.0,
            torso_inclination: 4.0,
            closeness: 420.0,
            shoulder_level: 10.0,
            ..Baseline::default()
        };
        let settings = TrackerSettings {
            fps: 10.0,
            warning_time: Duration::from_secs(5),
            alert_interval: Duration::from_secs(5),
        };
        PostureTracker::with_calibration(settings, baseline, Tolerance::new(tolerance)).unwrap()
    }

    fn snapshot(neck: f64) -> PostureMetrics {
        PostureMetrics {
            neck_inclination: neck,
            torso_inclination: 4.0,
            closeness: 420.0,
            shoulder_level: 10.0,
            ..PostureMetrics::default()
        }
    }

    #[test]
    fn test_good_frame_increments_good_counter() {
        let mut tracker = tracker(0);
        let report = tracker.tick(Some(&snapshot(30.0)), Duration::ZERO).unwrap();

        assert_eq!(report.verdict, Verdict::Good);
        assert_eq!(tracker.counters().good_frames(), 1);
        assert_eq!(tracker.counters().bad_frames(), 0);
    }

    #[test]
    fn test_bad_frame_resets_good_counter() {
        let mut tracker = tracker(0);
        tracker.tick(Some(&snapshot(30.0)), Duration::ZERO);
        tracker.tick(Some(&snapshot(30.0)), Duration::from_millis(100));
        let report = tracker.tick(Some(&snapshot(60.0)), Duration::from_millis(200)).unwrap();

        assert_eq!(report.verdict, Verdict::Bad);
        assert!(!report.checks.neck);
        assert_eq!(tracker.counters().good_frames(), 0);
        assert_eq!(tracker.counters().bad_frames(), 1);
    }

    #[test]
    fn test_absent_frame_keeps_counters() {
        let mut tracker = tracker(0);
        for i in 0..5 {
            tracker.tick(Some(&snapshot(30.0)), Duration::from_millis(i * 100));
        }
        assert!(tracker.tick(None, Duration::from_millis(500)).is_none());
        assert_eq!(tracker.counters().good_frames(), 5);
        assert_eq!(tracker.total_frames(), 5);
    }

    #[test]
    fn test_times_follow_frame_rate() {
        let mut tracker = tracker(0);
        let mut last = None;
        for i in 0..25 {
            last = tracker.tick(Some(&snapshot(30.0)), Duration::from_millis(i * 100));
        }
        let report = last.unwrap();
        assert!((report.good_time - 2.5).abs() < 1e-9);
        assert_eq!(report.bad_time, 0.0);
    }

    #[test]
    fn test_alert_fires_after_warning_time() {
        let mut tracker = tracker(0);
        let mut fired_at = Vec::new();
        // 10 fps, 8 seconds of bad posture
        for i in 0..80u64 {
            let now = Duration::from_millis(i * 100);
            let report = tracker.tick(Some(&snapshot(60.0)), now).unwrap();
            if report.alert {
                fired_at.push(i);
            }
        }
        // bad_time exceeds 5s on the 51st bad frame (index 50)
        assert_eq!(fired_at, vec![50]);
    }

    #[test]
    fn test_alert_repeats_after_cooldown() {
        let mut tracker = tracker(0);
        let mut alerts = 0;
        // 20 seconds of bad posture: alerts at 5.0s, 10.1s, 15.2s
        for i in 0..200u64 {
            let now = Duration::from_millis(i * 100);
            if tracker.tick(Some(&snapshot(60.0)), now).unwrap().alert {
                alerts += 1;
            }
        }
        assert_eq!(alerts, 3);
        assert_eq!(tracker.alert_state().last_alert(), Some(Duration::from_millis(15_200)));
    }

    #[test]
    fn test_alert_state_cooldown() {
        let mut state = AlertState::new(Duration::from_secs(5));
        assert!(state.try_fire(Duration::from_secs(1)));
        assert!(!state.try_fire(Duration::from_secs(3)));
        assert!(!state.try_fire(Duration::from_secs(6)));
        assert!(state.try_fire(Duration::from_millis(6_001)));
    }

    #[test]
    fn test_set_baseline_makes_current_posture_good() {
        let mut tracker = tracker(0);
        let slouched = snapshot(55.0);
        assert_eq!(tracker.tick(Some(&slouched), Duration::ZERO).unwrap().verdict, Verdict::Bad);

        tracker.set_baseline(&slouched);
        assert_eq!(
            tracker.tick(Some(&slouched), Duration::from_millis(100)).unwrap().verdict,
            Verdict::Good
        );
    }

    #[test]
    fn test_higher_tolerance_accepts_drift() {
        let mut strict = tracker(0);
        let mut lenient = tracker(10);
        let drifted = snapshot(42.0);

        assert_eq!(strict.tick(Some(&drifted), Duration::ZERO).unwrap().verdict, Verdict::Bad);
        assert_eq!(lenient.tick(Some(&drifted), Duration::ZERO).unwrap().verdict, Verdict::Good);
    }

    #[test]
    fn test_rejects_invalid_fps() {
        let settings = TrackerSettings {
            fps: 0.0,
            ..TrackerSettings::default()
        };
        assert!(PostureTracker::new(settings).is_err());

        let settings = TrackerSettings {
            fps: f64::NAN,
            ..TrackerSettings::default()
        };
        assert!(PostureTracker::new(settings).is_err());
    }
}
