//! Open-ended product sleeve: two panels and a glue flap on the right.
//!
//! Wrap allowance: +1 caliper on each panel.

use super::{glue_flap, positive, wrapped, Strip, StripPanel};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("W", "Panel width", 120.0, 5.0, 800.0),
    ParamSpec::new("H", "Height", 160.0, 5.0, 800.0),
    ParamSpec::new("glue", "Glue flap", 12.0, 6.0, 40.0),
];

pub const WRAP_ALLOWANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleeveParams {
    pub width: f64,
    pub height: f64,
    pub glue: f64,
}

impl SleeveParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            width: set.require("W")?,
            height: set.require("H")?,
            glue: set.require("glue")?,
        })
    }
}

impl Default for SleeveParams {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 160.0,
            glue: 12.0,
        }
    }
}

pub fn build(params: &SleeveParams, caliper: f64) -> Result<GeometryResult> {
    let panel = positive("W", wrapped(params.width, WRAP_ALLOWANCE, caliper))?;
    let height = positive("H", params.height)?;
    let glue = positive("glue", params.glue)?;

    Ok(Strip::new(height)
        .panel(StripPanel::new(panel))
        .panel(StripPanel::new(panel))
        .right(glue_flap(height, glue))
        .render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleeve_layout() {
        let geometry = build(&SleeveParams::default(), 0.5).unwrap();
        assert!((geometry.bbox.w - (2.0 * 120.5 + 12.0)).abs() < 1e-9);
        assert_eq!(geometry.bbox.h, 160.0);
        // fold between the panels and the glue hinge
        assert_eq!(geometry.crease.len(), 2);
        assert_eq!(geometry.metrics.tongue_clearance, None);
    }
}
