//! Utility functions for numeric conversion and time formatting.

pub mod safe_cast;

use std::time::Duration;

/// Format a duration as `HH:MM:SS`, dropping fractional seconds
#[must_use]
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Round seconds to one decimal place for on-screen readouts
#[must_use]
pub fn round_tenths(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}
