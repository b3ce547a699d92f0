//! Error handling for DielineKit
//!
//! Two fatal error classes exist in the core:
//! - `InvalidDimension`: a dimension is non-positive after conversion
//! - `InvalidParameter`: a key is missing, unknown, or out of bounds
//!
//! Preflight findings are never errors; they are reported as messages.

use thiserror::Error;

/// Errors raised when a parameter is rejected at the input boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A key declared by the template schema was not supplied.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A key that the template schema does not declare.
    #[error("Unknown parameter: {0}")]
    Unknown(String),

    /// A value outside the declared bounds.
    #[error("Parameter '{name}' out of range: {value} (valid range: {min} - {max})")]
    OutOfRange {
        /// The parameter key.
        name: String,
        /// The rejected value.
        value: f64,
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },

    /// NaN or infinite input.
    #[error("Parameter '{name}' must be a finite number")]
    NotFinite {
        /// The parameter key.
        name: String,
    },

    /// Any other rejected value, with a reason.
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidValue {
        /// The parameter name.
        name: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Main error type for geometry generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DielineError {
    /// A working dimension is zero or negative.
    #[error("Invalid dimension '{name}': {value:.3} mm (must be greater than zero)")]
    InvalidDimension {
        /// The dimension key or derived quantity.
        name: String,
        /// The offending value in millimeters.
        value: f64,
    },

    /// A parameter was rejected.
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}

impl DielineError {
    /// Shorthand for [`DielineError::InvalidDimension`].
    pub fn invalid_dimension(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidDimension {
            name: name.into(),
            value,
        }
    }

    /// Shorthand for an [`ParameterError::InvalidValue`] wrapped as a `DielineError`.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter(ParameterError::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        })
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, DielineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "glue".to_string(),
            value: 2.0,
            min: 6.0,
            max: 40.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'glue' out of range: 2 (valid range: 6 - 40)"
        );

        let err = ParameterError::Missing("tuck".to_string());
        assert_eq!(err.to_string(), "Missing required parameter: tuck");
    }

    #[test]
    fn test_invalid_dimension_display() {
        let err = DielineError::invalid_dimension("L", -0.5);
        assert_eq!(
            err.to_string(),
            "Invalid dimension 'L': -0.500 mm (must be greater than zero)"
        );
    }

    #[test]
    fn test_parameter_error_is_transparent() {
        let err: DielineError = ParameterError::Unknown("foo".to_string()).into();
        assert_eq!(err.to_string(), "Unknown parameter: foo");
        assert!(matches!(err, DielineError::InvalidParameter(_)));
    }
}
