//! Good/bad posture verdict for a single metrics snapshot.
//!
//! Each checked metric is compared against a calibrated [`Baseline`] using an
//! acceptance band whose width grows with the user-controlled [`Tolerance`].
//! Larger tolerance never narrows any band.

use crate::{
    constants::{
        CLOSENESS_BAND_ABOVE, CLOSENESS_BAND_BELOW, DEFAULT_BASELINE_CLOSENESS, DEFAULT_BASELINE_NECK_INCLINATION,
        DEFAULT_BASELINE_OFFSET, DEFAULT_BASELINE_SHOULDER_DISTANCE, DEFAULT_BASELINE_SHOULDER_LEVEL,
        DEFAULT_BASELINE_TORSO_INCLINATION, DEFAULT_TOLERANCE, NECK_BAND_MARGIN, NECK_BAND_PER_TOLERANCE,
        SHOULDER_LEVEL_BAND_PER_TOLERANCE, TOLERANCE_MAX, TOLERANCE_MIN,
    },
    metrics::PostureMetrics,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference posture the live metrics are compared against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Shoulder alignment offset in pixels
    pub offset: f64,
    /// Neck inclination in degrees
    pub neck_inclination: f64,
    /// Torso inclination in degrees
    pub torso_inclination: f64,
    /// Shoulder distance in pixels
    pub shoulder_distance: f64,
    /// Closeness (depth) in pixels
    pub closeness: f64,
    /// Shoulder level difference in pixels
    pub shoulder_level: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            offset: DEFAULT_BASELINE_OFFSET,
            neck_inclination: DEFAULT_BASELINE_NECK_INCLINATION,
            torso_inclination: DEFAULT_BASELINE_TORSO_INCLINATION,
            shoulder_distance: DEFAULT_BASELINE_SHOULDER_DISTANCE,
            closeness: DEFAULT_BASELINE_CLOSENESS,
            shoulder_level: DEFAULT_BASELINE_SHOULDER_LEVEL,
        }
    }
}

impl Baseline {
    /// Baseline captured from the current frame; the alignment offset is kept
    #[must_use]
    pub fn recalibrated(&self, metrics: &PostureMetrics) -> Self {
        Self {
            offset: self.offset,
            neck_inclination: metrics.neck_inclination,
            torso_inclination: metrics.torso_inclination,
            shoulder_distance: metrics.shoulder_distance,
            closeness: metrics.closeness,
            shoulder_level: metrics.shoulder_level,
        }
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "offset: {}", self.offset as i64)?;
        writeln!(f, "neck: {}", self.neck_inclination as i64)?;
        writeln!(f, "torso: {}", self.torso_inclination as i64)?;
        writeln!(f, "closeness: {}", self.closeness as i64)?;
        writeln!(f, "shldr level: {}", self.shoulder_level as i64)?;
        write!(f, "shldr distance: {}", self.shoulder_distance as i64)
    }
}

/// How lenient the posture checks are, from 0 (strict) to 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tolerance(u8);

impl Tolerance {
    /// Strictest setting
    pub const MIN: Self = Self(TOLERANCE_MIN);
    /// Most lenient setting
    pub const MAX: Self = Self(TOLERANCE_MAX);

    /// Tolerance clamped into the valid range
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(TOLERANCE_MIN, TOLERANCE_MAX))
    }

    /// Tolerance from a raw slider position, wrapped into the valid range
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rem_euclid keeps it in 0..=10
    pub fn from_slider(position: i64) -> Self {
        Self(position.rem_euclid(i64::from(TOLERANCE_MAX) + 1) as u8)
    }

    /// Raw value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// One step more lenient, saturating at the maximum
    #[must_use]
    pub fn increased(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step stricter, saturating at the minimum
    #[must_use]
    pub fn decreased(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_TOLERANCE)
    }
}

impl TryFrom<u8> for Tolerance {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if (TOLERANCE_MIN..=TOLERANCE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("tolerance must be between {TOLERANCE_MIN} and {TOLERANCE_MAX}, got {value}"))
        }
    }
}

impl From<Tolerance> for u8 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Overall posture verdict for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Every checked metric is within its band
    Good,
    /// At least one checked metric is outside its band
    Bad,
}

impl Verdict {
    /// True for [`Verdict::Good`]
    #[must_use]
    pub const fn is_good(self) -> bool {
        matches!(self, Self::Good)
    }
}

/// Outcome of each individual band check, for per-metric coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricChecks {
    /// Distance to camera is within band
    pub closeness: bool,
    /// Neck inclination is within band
    pub neck: bool,
    /// Shoulder level difference is within band
    pub shoulder_level: bool,
}

impl MetricChecks {
    /// Verdict combining all checks
    #[must_use]
    pub const fn verdict(self) -> Verdict {
        if self.closeness && self.neck && self.shoulder_level {
            Verdict::Good
        } else {
            Verdict::Bad
        }
    }
}

/// Closed interval a metric must fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lowest accepted value
    pub low: f64,
    /// Highest accepted value
    pub high: f64,
}

impl Band {
    /// True when `value` lies inside the band, bounds included
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Accepted closeness range; wider toward the camera (larger depth) than away from it
#[must_use]
pub fn closeness_band(baseline: &Baseline, tolerance: Tolerance) -> Band {
    let t = tolerance.as_f64();
    Band {
        low: baseline.closeness - t * CLOSENESS_BAND_BELOW,
        high: baseline.closeness + t * CLOSENESS_BAND_ABOVE,
    }
}

/// Accepted neck inclination range
#[must_use]
pub fn neck_band(baseline: &Baseline, tolerance: Tolerance) -> Band {
    let half_width = tolerance.as_f64() * NECK_BAND_PER_TOLERANCE + NECK_BAND_MARGIN;
    Band {
        low: baseline.neck_inclination - half_width,
        high: baseline.neck_inclination + half_width,
    }
}

/// Accepted shoulder level range
#[must_use]
pub fn shoulder_level_band(baseline: &Baseline, tolerance: Tolerance) -> Band {
    let half_width = tolerance.as_f64() * SHOULDER_LEVEL_BAND_PER_TOLERANCE;
    Band {
        low: baseline.shoulder_level - half_width,
        high: baseline.shoulder_level + half_width,
    }
}

/// Run every band check for one snapshot
#[must_use]
pub fn check_metrics(metrics: &PostureMetrics, baseline: &Baseline, tolerance: Tolerance) -> MetricChecks {
    MetricChecks {
        closeness: closeness_band(baseline, tolerance).contains(metrics.closeness),
        neck: neck_band(baseline, tolerance).contains(metrics.neck_inclination),
        shoulder_level: shoulder_level_band(baseline, tolerance).contains(metrics.shoulder_level),
    }
}

/// Verdict for one snapshot
#[must_use]
pub fn classify(metrics: &PostureMetrics, baseline: &Baseline, tolerance: Tolerance) -> Verdict {
    check_metrics(metrics, baseline, tolerance).verdict()
}
