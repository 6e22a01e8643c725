//! Pixel-space geometric primitives used by the posture metrics.

use crate::{constants::EPSILON, Error, Result};

/// Euclidean distance between two pixel positions
#[must_use]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Angle in whole degrees between the segment `(x1, y1)-(x2, y2)` and the
/// vertical axis through `(x1, y1)`
///
/// The angle is measured against a reference vector running from `(x1, y1)`
/// up to `(x1, 0)`, i.e. `acos((y2 - y1) * (-y1) / (|segment| * y1))`. A point
/// straight above the reference gives 0, a point level with it gives 90.
/// The result is truncated toward zero.
///
/// # Errors
///
/// Returns [`Error::DegenerateGeometry`] when `y1` is zero (the reference vector
/// has no length) or when both points coincide.
pub fn inclination_angle(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<f64> {
    if y1.abs() < EPSILON {
        return Err(Error::DegenerateGeometry(format!(
            "reference point ({x1}, {y1}) lies on the top edge"
        )));
    }

    let length = distance(x1, y1, x2, y2);
    if length < EPSILON {
        return Err(Error::DegenerateGeometry(format!(
            "segment from ({x1}, {y1}) to ({x2}, {y2}) has zero length"
        )));
    }

    let cosine = ((y2 - y1) * (-y1) / (length * y1)).clamp(-1.0, 1.0);
    let degrees = cosine.acos().to_degrees();

    // Absorb representation error so exact angles do not truncate one degree low
    Ok((degrees + EPSILON).trunc())
}
