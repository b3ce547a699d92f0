//! Dimension converter
//!
//! Converts the dimensions a user asks for (inside of the box, outside of
//! the box, or product size plus clearance) into the internal working
//! dimensions every builder lays out.
//!
//! External mode removes the wall build-up: two calipers on length and
//! width, one caliper on height. Product-clearance mode adds the clearance
//! twice on length and width and once on height.

use crate::error::{DielineError, ParameterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis of a box dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    /// Number of walls stacked along this axis.
    fn walls(self) -> f64 {
        match self {
            Self::Length | Self::Width => 2.0,
            Self::Height => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Length => "L",
            Self::Width => "W",
            Self::Height => "H",
        }
    }
}

/// How requested dimensions are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DimensionMode {
    /// Requested values are the inside of the box.
    #[default]
    Internal,
    /// Requested values are the outside of the box.
    External,
    /// Requested values are the product size; `clearance` is added around it.
    ProductClearance {
        /// Clearance in millimeters.
        clearance: f64,
    },
}

impl DimensionMode {
    /// Convert a single requested value along `axis` to its internal value.
    pub fn convert(self, value: f64, axis: Axis, caliper: f64) -> f64 {
        match self {
            Self::Internal => value,
            Self::External => value - axis.walls() * caliper,
            Self::ProductClearance { clearance } => value + axis.walls() * clearance,
        }
    }

    /// Inverse of [`DimensionMode::convert`].
    pub fn revert(self, internal: f64, axis: Axis, caliper: f64) -> f64 {
        match self {
            Self::Internal => internal,
            Self::External => internal + axis.walls() * caliper,
            Self::ProductClearance { clearance } => internal - axis.walls() * clearance,
        }
    }

    /// Reject a non-finite or negative clearance.
    pub fn check(self) -> std::result::Result<(), ParameterError> {
        if let Self::ProductClearance { clearance } = self {
            if !clearance.is_finite() {
                return Err(ParameterError::NotFinite {
                    name: "clearance".to_string(),
                });
            }
            if clearance < 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: "clearance".to_string(),
                    reason: "clearance cannot be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for DimensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
            Self::ProductClearance { clearance } => write!(f, "clearance:{}", clearance),
        }
    }
}

impl FromStr for DimensionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "internal" | "inside" => Ok(Self::Internal),
            "external" | "outside" => Ok(Self::External),
            _ => match lower.split_once(':') {
                Some(("clearance", value)) => value
                    .trim()
                    .parse::<f64>()
                    .map(|clearance| Self::ProductClearance { clearance })
                    .map_err(|e| format!("Invalid clearance '{}': {}", value, e)),
                _ => Err(format!("Unknown dimension mode: {}", s)),
            },
        }
    }
}

/// Length, width and height of a box, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    fn map(self, f: impl Fn(f64, Axis) -> f64) -> Self {
        Self {
            length: f(self.length, Axis::Length),
            width: f(self.width, Axis::Width),
            height: f(self.height, Axis::Height),
        }
    }
}

/// Validate a material caliper.
pub fn check_caliper(caliper: f64) -> std::result::Result<(), ParameterError> {
    if !caliper.is_finite() {
        return Err(ParameterError::NotFinite {
            name: "caliper".to_string(),
        });
    }
    if caliper <= 0.0 {
        return Err(ParameterError::InvalidValue {
            name: "caliper".to_string(),
            reason: format!("caliper must be positive, got {}", caliper),
        });
    }
    Ok(())
}

/// Convert requested dimensions to internal working dimensions.
///
/// Fails with `InvalidDimension` when any converted value is not positive
/// and with `InvalidParameter` when the caliper or clearance is unusable.
pub fn to_canonical(requested: Dimensions, mode: DimensionMode, caliper: f64) -> Result<Dimensions> {
    check_caliper(caliper)?;
    mode.check()?;

    let internal = requested.map(|value, axis| mode.convert(value, axis, caliper));
    for axis in [Axis::Length, Axis::Width, Axis::Height] {
        let value = internal.get(axis);
        if value.is_nan() || value <= 0.0 {
            return Err(DielineError::invalid_dimension(axis.label(), value));
        }
    }
    Ok(internal)
}

/// External dimensions of a box with the given internal dimensions.
pub fn to_external(internal: Dimensions, caliper: f64) -> Dimensions {
    internal.map(|value, axis| DimensionMode::External.revert(value, axis, caliper))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{} != {} (tol {})", a, b, tol);
    }

    #[test]
    fn test_internal_is_identity() {
        let dims = Dimensions::new(100.0, 50.0, 20.0);
        assert_eq!(to_canonical(dims, DimensionMode::Internal, 0.3).unwrap(), dims);
    }

    #[test]
    fn test_external_inches() {
        let dims = Dimensions::new(4.036, 2.036, 6.018);
        let internal = to_canonical(dims, DimensionMode::External, 0.018).unwrap();
        assert_close(internal.length, 4.000, 0.003);
        assert_close(internal.width, 2.000, 0.003);
        assert_close(internal.height, 6.000, 0.003);
    }

    #[test]
    fn test_product_clearance() {
        let dims = Dimensions::new(3.7, 1.7, 5.8);
        let mode = DimensionMode::ProductClearance { clearance: 0.15 };
        let internal = to_canonical(dims, mode, 0.3).unwrap();
        assert_close(internal.length, 4.0, 1e-9);
        assert_close(internal.width, 2.0, 1e-9);
        assert_close(internal.height, 5.95, 1e-9);
    }

    #[test]
    fn test_non_positive_result_is_rejected() {
        let dims = Dimensions::new(0.5, 50.0, 20.0);
        let err = to_canonical(dims, DimensionMode::External, 0.3).unwrap_err();
        assert!(matches!(err, DielineError::InvalidDimension { ref name, .. } if name == "L"));
    }

    #[test]
    fn test_bad_caliper_is_rejected() {
        let dims = Dimensions::new(10.0, 10.0, 10.0);
        assert!(matches!(
            to_canonical(dims, DimensionMode::Internal, 0.0),
            Err(DielineError::InvalidParameter(_))
        ));
        assert!(matches!(
            to_canonical(dims, DimensionMode::Internal, f64::NAN),
            Err(DielineError::InvalidParameter(ParameterError::NotFinite { .. }))
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("external".parse::<DimensionMode>().unwrap(), DimensionMode::External);
        assert_eq!(
            "clearance:1.5".parse::<DimensionMode>().unwrap(),
            DimensionMode::ProductClearance { clearance: 1.5 }
        );
        assert!("clearance:x".parse::<DimensionMode>().is_err());
        assert!("sideways".parse::<DimensionMode>().is_err());
    }

    proptest::proptest! {
        #[test]
        fn external_round_trip(
            length in 20.0f64..2000.0,
            width in 20.0f64..2000.0,
            height in 20.0f64..2000.0,
            caliper in 0.1f64..5.0,
        ) {
            let requested = Dimensions::new(length, width, height);
            let internal = to_canonical(requested, DimensionMode::External, caliper).unwrap();
            let back = to_external(internal, caliper);
            proptest::prop_assert!((back.length - length).abs() < 1e-9);
            proptest::prop_assert!((back.width - width).abs() < 1e-9);
            proptest::prop_assert!((back.height - height).abs() < 1e-9);
        }
    }
}
