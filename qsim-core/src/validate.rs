//! Parameter validation helpers
//!
//! Constructors and analytical functions run their inputs through these
//! checks and fail with a [`ParameterError`] instead of computing on
//! nonsense values.

use crate::error::ParameterError;

/// Result of a parameter check
pub type ValidationResult<T> = Result<T, ParameterError>;

/// Helper for validating that a value is a finite real number
pub fn validate_finite(field: &'static str, value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::ConstraintViolation {
            field,
            constraint: "finite",
            value,
        })
    }
}

/// Helper for validating that a value is finite and strictly positive
pub fn validate_positive(field: &'static str, value: f64) -> ValidationResult<f64> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        Err(ParameterError::ConstraintViolation {
            field,
            constraint: "positive",
            value,
        })
    } else {
        Ok(value)
    }
}

/// Helper for validating that a count is at least one
pub fn validate_positive_count(field: &'static str, value: usize) -> ValidationResult<usize> {
    if value == 0 {
        Err(ParameterError::ConstraintViolation {
            field,
            constraint: "at least 1",
            value: 0.0,
        })
    } else {
        Ok(value)
    }
}

/// Check that a probability mass sums to one within `tolerance`
pub fn validate_probability_sum(
    field: &'static str,
    probabilities: impl IntoIterator<Item = f64>,
    tolerance: f64,
) -> ValidationResult<()> {
    let total: f64 = probabilities.into_iter().sum();
    if (total - 1.0).abs() <= tolerance {
        Ok(())
    } else {
        Err(ParameterError::ConstraintViolation {
            field,
            constraint: "a distribution summing to 1",
            value: total,
        })
    }
}
