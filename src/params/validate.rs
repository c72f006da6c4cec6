//! Construction-time validation helpers.
//!
//! Every check names the object and the parameter so the host can report
//! exactly which input block is wrong.

use crate::error::{ConfigurationError, Result};

/// Parallel lists must have equal lengths.
pub fn check_lengths(
    object: &'static str,
    left: &'static str,
    left_len: usize,
    right: &'static str,
    right_len: usize,
) -> Result<()> {
    if left_len != right_len {
        return Err(ConfigurationError::LengthMismatch {
            object,
            left,
            left_len,
            right,
            right_len,
        });
    }
    Ok(())
}

/// Value must be strictly positive.
pub fn check_positive(object: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(ConfigurationError::OutOfRange {
            object,
            parameter,
            value,
            expected: "must be > 0",
        });
    }
    Ok(())
}

/// Value must be zero or positive.
pub fn check_non_negative(object: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if !(value >= 0.0) {
        return Err(ConfigurationError::OutOfRange {
            object,
            parameter,
            value,
            expected: "must be >= 0",
        });
    }
    Ok(())
}

/// Value must lie in the closed interval `[lo, hi]`.
pub fn check_in_range(
    object: &'static str,
    parameter: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    expected: &'static str,
) -> Result<()> {
    if !(value >= lo && value <= hi) {
        return Err(ConfigurationError::OutOfRange {
            object,
            parameter,
            value,
            expected,
        });
    }
    Ok(())
}

/// Spatial direction must be 0 (x), 1 (y), or 2 (z).
pub fn check_direction(object: &'static str, direction: usize) -> Result<usize> {
    if direction > 2 {
        return Err(ConfigurationError::OutOfRange {
            object,
            parameter: "direction",
            value: direction as f64,
            expected: "must be 0, 1, or 2",
        });
    }
    Ok(direction)
}

/// List must contain at least one entry.
pub fn check_non_empty(object: &'static str, parameter: &'static str, len: usize) -> Result<()> {
    if len == 0 {
        return Err(ConfigurationError::MissingParameter { object, parameter });
    }
    Ok(())
}
