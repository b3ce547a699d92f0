//! Parameter schemas and parameter sets
//!
//! A template declares its parameters as a static slice of [`ParamSpec`].
//! User input is held in a [`ParameterSet`] and checked against the schema
//! before any geometry is generated; out-of-bounds values are rejected,
//! never clamped.

use dielinekit_core::dimensions::{Axis, DimensionMode};
use dielinekit_core::{DielineError, ParameterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamSpec {
    pub const fn new(key: &'static str, label: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            default,
            min,
            max,
            step: 1.0,
        }
    }

    pub fn check(&self, value: f64) -> std::result::Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NotFinite {
                name: self.key.to_string(),
            });
        }
        if value < self.min || value > self.max {
            return Err(ParameterError::OutOfRange {
                name: self.key.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Which schema keys hold the box length, width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionKeys {
    pub length: Option<&'static str>,
    pub width: Option<&'static str>,
    pub height: Option<&'static str>,
}

impl DimensionKeys {
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &'static str)> {
        [
            (Axis::Length, self.length),
            (Axis::Width, self.width),
            (Axis::Height, self.height),
        ]
        .into_iter()
        .filter_map(|(axis, key)| key.map(|k| (axis, k)))
    }
}

/// Parameter values by key, in millimeters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key of `schema` at its default.
    pub fn from_defaults(schema: &[ParamSpec]) -> Self {
        Self {
            values: schema
                .iter()
                .map(|spec| (spec.key.to_string(), spec.default))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn require(&self, key: &str) -> std::result::Result<f64, ParameterError> {
        self.get(key)
            .ok_or_else(|| ParameterError::Missing(key.to_string()))
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Builder-style [`ParameterSet::set`].
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that the set holds exactly the schema's keys, each finite and in bounds.
    pub fn validate(&self, schema: &[ParamSpec]) -> std::result::Result<(), ParameterError> {
        if let Some(unknown) = self
            .values
            .keys()
            .find(|k| !schema.iter().any(|spec| spec.key == k.as_str()))
        {
            return Err(ParameterError::Unknown(unknown.clone()));
        }
        for spec in schema {
            spec.check(self.require(spec.key)?)?;
        }
        Ok(())
    }
}

/// Apply the dimension mode to the length, width and height keys.
///
/// Other keys pass through unchanged. A converted value that is not
/// positive is an `InvalidDimension` naming the key.
pub fn convert_parameters(
    params: &ParameterSet,
    keys: DimensionKeys,
    mode: DimensionMode,
    caliper: f64,
) -> Result<ParameterSet> {
    dielinekit_core::dimensions::check_caliper(caliper)?;
    mode.check()?;

    let mut converted = params.clone();
    for (axis, key) in keys.iter() {
        let requested = params.require(key)?;
        let value = mode.convert(requested, axis, caliper);
        if value.is_nan() || value <= 0.0 {
            return Err(DielineError::invalid_dimension(key, value));
        }
        converted.set(key, value);
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[ParamSpec] = &[
        ParamSpec::new("L", "Length", 100.0, 10.0, 500.0),
        ParamSpec::new("glue", "Glue flap", 15.0, 6.0, 40.0),
    ];

    #[test]
    fn test_defaults_validate() {
        let params = ParameterSet::from_defaults(SCHEMA);
        assert_eq!(params.len(), 2);
        assert!(params.validate(SCHEMA).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sets() {
        let params = ParameterSet::from_defaults(SCHEMA).with("glue", 2.0);
        assert!(matches!(
            params.validate(SCHEMA),
            Err(ParameterError::OutOfRange { ref name, .. }) if name == "glue"
        ));

        let params = ParameterSet::from_defaults(SCHEMA).with("slot", 6.0);
        assert_eq!(params.validate(SCHEMA), Err(ParameterError::Unknown("slot".to_string())));

        let params = ParameterSet::new().with("L", 100.0);
        assert_eq!(params.validate(SCHEMA), Err(ParameterError::Missing("glue".to_string())));

        let params = ParameterSet::from_defaults(SCHEMA).with("L", f64::INFINITY);
        assert!(matches!(params.validate(SCHEMA), Err(ParameterError::NotFinite { .. })));
    }

    #[test]
    fn test_convert_only_touches_dimension_keys() {
        let keys = DimensionKeys {
            length: Some("L"),
            ..Default::default()
        };
        let params = ParameterSet::from_defaults(SCHEMA);
        let converted = convert_parameters(&params, keys, DimensionMode::External, 3.0).unwrap();
        assert_eq!(converted.get("L"), Some(94.0));
        assert_eq!(converted.get("glue"), Some(15.0));
    }

    #[test]
    fn test_convert_names_failing_key() {
        let keys = DimensionKeys {
            length: Some("L"),
            ..Default::default()
        };
        let params = ParameterSet::new().with("L", 4.0);
        let err = convert_parameters(&params, keys, DimensionMode::External, 3.0).unwrap_err();
        assert_eq!(err, DielineError::invalid_dimension("L", -2.0));
    }
}
