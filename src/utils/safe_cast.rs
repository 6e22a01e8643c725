//! Safe casting utilities for pixel coordinates and model tensor indexing

use crate::{Error, Result};

/// Safely convert usize to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Safely convert f64 to i32 with bounds checking, truncating toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Scale a normalized coordinate by an image extent and truncate to a pixel index
///
/// Values outside `[0, 1]` are allowed; the pose engine reports off-frame
/// points with coordinates slightly outside the unit range.
///
/// # Errors
///
/// Returns an error if the coordinate is not finite or the extent is not positive
pub fn normalized_to_pixel(value: f32, extent: i32) -> Result<i32> {
    if extent <= 0 {
        return Err(Error::InvalidInput(format!("Image extent must be positive, got {extent}")));
    }
    f64_to_i32(f64::from(value) * f64::from(extent))
}

/// Clamp and convert f64 to i32 for drawing coordinates
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(f64::from(min), f64::from(max));
    (clamped as i32).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_usize_to_i32() {
        assert_eq!(usize_to_i32(42).unwrap(), 42);
        assert_eq!(usize_to_i32(0).unwrap(), 0);
        assert_eq!(usize_to_i32(i32::MAX as usize).unwrap(), i32::MAX);

        if std::mem::size_of::<usize>() > 4 {
            assert!(usize_to_i32(i32::MAX as usize + 1).is_err());
        }
    }

    #[test]
    fn test_f64_to_i32() {
        assert_eq!(f64_to_i32(42.0).unwrap(), 42);
        assert_eq!(f64_to_i32(-42.0).unwrap(), -42);
        assert_eq!(f64_to_i32(0.9999).unwrap(), 0);
        assert_eq!(f64_to_i32(-0.9999).unwrap(), 0);

        assert!(f64_to_i32(f64::INFINITY).is_err());
        assert!(f64_to_i32(f64::NAN).is_err());
        assert!(f64_to_i32(2147483648.0).is_err());
    }

    #[test]
    fn test_normalized_to_pixel_truncates() {
        assert_eq!(normalized_to_pixel(0.5, 640).unwrap(), 320);
        assert_eq!(normalized_to_pixel(0.999, 480).unwrap(), 479);
        assert_eq!(normalized_to_pixel(0.0, 480).unwrap(), 0);
        assert_eq!(normalized_to_pixel(-0.01, 640).unwrap(), -6);
    }

    #[test]
    fn test_normalized_to_pixel_rejects_bad_input() {
        assert!(normalized_to_pixel(f32::NAN, 640).is_err());
        assert!(normalized_to_pixel(0.5, 0).is_err());
        assert!(normalized_to_pixel(0.5, -10).is_err());
    }

    #[test]
    fn test_f64_to_i32_clamp() {
        assert_eq!(f64_to_i32_clamp(50.0, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(50.0, 100, 0), 50);
    }

    proptest! {
        #[test]
        fn prop_normalized_to_pixel_stays_in_frame(value in 0.0f32..1.0, extent in 1..4096i32) {
            let pixel = normalized_to_pixel(value, extent).unwrap();
            prop_assert!(pixel >= 0);
            prop_assert!(pixel < extent);
        }

        #[test]
        fn prop_f64_to_i32_clamp_always_within_bounds(
            value in any::<f64>(),
            min in any::<i32>(),
            max in any::<i32>()
        ) {
            let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
            let result = f64_to_i32_clamp(value, min, max);
            prop_assert!(result >= lo);
            prop_assert!(result <= hi);
        }
    }
}
