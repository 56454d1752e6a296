//! Input validation error types.
//!
//! Used when checking configuration files and user-supplied parameters
//! (thresholds, corner ranges, improvement percentages) before they reach
//! the analysis core.

use core::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value is required but missing
    #[error("Required field '{0}' is missing")]
    Required(String),

    /// A lower bound exceeds its upper bound
    #[error("Invalid range for '{field}': {low} > {high}")]
    InvertedRange {
        /// Field name
        field: String,
        /// Lower bound as supplied
        low: String,
        /// Upper bound as supplied
        high: String,
    },
}

impl ValidationError {
    /// Create an out of range error for a numeric value.
    pub fn out_of_range<T: fmt::Debug>(
        field: impl Into<String>,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }

    /// Create a required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required(field.into())
    }

    /// Create an inverted range error.
    pub fn inverted_range<T: fmt::Debug>(field: impl Into<String>, low: T, high: T) -> Self {
        ValidationError::InvertedRange {
            field: field.into(),
            low: format!("{low:?}"),
            high: format!("{high:?}"),
        }
    }
}
