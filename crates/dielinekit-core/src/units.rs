//! Unit conversion utilities
//!
//! All geometry is computed in millimeters. This module converts user input
//! in Metric (mm) or Imperial (inch) to millimeters and formats results back.
//! Supports decimal and fractional inch parsing ("1 1/2").

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

impl MeasurementSystem {
    /// Convert a value expressed in this system to millimeters.
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Metric => value,
            Self::Imperial => value * MM_PER_INCH,
        }
    }

    /// Convert millimeters to a value expressed in this system.
    pub fn from_mm(self, value_mm: f64) -> f64 {
        match self {
            Self::Metric => value_mm,
            Self::Imperial => value_mm / MM_PER_INCH,
        }
    }
}

/// Format length value for display
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    format!("{:.3}", system.from_mm(value_mm))
}

/// Format a length with its unit label, e.g. `"335.000 mm"`.
pub fn format_length_with_unit(value_mm: f64, system: MeasurementSystem) -> String {
    format!("{} {}", format_length(value_mm, system), unit_label(system))
}

fn invalid(input: &str, reason: &str) -> ParameterError {
    ParameterError::InvalidValue {
        name: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse length string to millimeters
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, ParameterError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid(input, "empty length"));
    }

    let value = match system {
        MeasurementSystem::Metric => input
            .parse::<f64>()
            .map_err(|e| invalid(input, &e.to_string()))?,
        MeasurementSystem::Imperial if input.contains('/') => {
            let negative = input.starts_with('-');
            let body = input.trim_start_matches('-');
            let mut total_inches = 0.0;

            for part in body.split_whitespace() {
                if let Some((num, den)) = part.split_once('/') {
                    let num = num
                        .parse::<f64>()
                        .map_err(|_| invalid(input, "invalid numerator"))?;
                    let den = den
                        .parse::<f64>()
                        .map_err(|_| invalid(input, "invalid denominator"))?;
                    if den == 0.0 {
                        return Err(invalid(input, "division by zero"));
                    }
                    total_inches += num / den;
                } else {
                    total_inches += part
                        .parse::<f64>()
                        .map_err(|_| invalid(input, "invalid number part"))?;
                }
            }
            let inches = if negative { -total_inches } else { total_inches };
            inches * MM_PER_INCH
        }
        MeasurementSystem::Imperial => {
            let inches = input
                .parse::<f64>()
                .map_err(|e| invalid(input, &e.to_string()))?;
            inches * MM_PER_INCH
        }
    };

    if !value.is_finite() {
        return Err(ParameterError::NotFinite {
            name: input.to_string(),
        });
    }
    Ok(value)
}

/// Get the unit label for the given system ("mm" or "in")
pub fn unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}
