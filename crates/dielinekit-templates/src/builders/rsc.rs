//! Regular slotted container (FEFCO 0201)
//!
//! Manufacturer's joint, then panels L, W, L, W. Every panel carries a top
//! and a bottom flap of depth W. Adjacent flaps are separated by the slot
//! gap, split evenly across the panel boundary.
//!
//! Wrap allowance: none. The flat size is exactly glue + 2(L + W) by H + 2W.
//! Panels must stay wider than the widest slot gap.

use super::{glue_flap, positive, wrapped, Flap, Strip, StripPanel};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("L", "Length", 300.0, 25.0, 2000.0),
    ParamSpec::new("W", "Width", 200.0, 25.0, 1500.0),
    ParamSpec::new("H", "Height", 200.0, 5.0, 1500.0),
    ParamSpec::new("glue", "Manufacturer's joint", 35.0, 20.0, 60.0),
    ParamSpec::new("slot", "Slot gap", 6.0, 3.0, 20.0),
];

pub const WRAP_ALLOWANCE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RscParams {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub glue: f64,
    pub slot: f64,
}

impl RscParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            length: set.require("L")?,
            width: set.require("W")?,
            height: set.require("H")?,
            glue: set.require("glue")?,
            slot: set.require("slot")?,
        })
    }
}

impl Default for RscParams {
    fn default() -> Self {
        Self {
            length: 300.0,
            width: 200.0,
            height: 200.0,
            glue: 35.0,
            slot: 6.0,
        }
    }
}

pub fn build(params: &RscParams, caliper: f64) -> Result<GeometryResult> {
    let length = positive("L", params.length)?;
    let width = positive("W", params.width)?;
    let height = positive("H", params.height)?;
    let glue = positive("glue", params.glue)?;
    let half_slot = positive("slot", params.slot)? / 2.0;

    let widths = [length, width, length, width];
    let last = widths.len() - 1;
    let mut strip = Strip::new(height).left(glue_flap(height, glue));
    for (i, nominal) in widths.into_iter().enumerate() {
        let panel = wrapped(nominal, WRAP_ALLOWANCE, caliper);
        let left = if i > 0 { half_slot } else { 0.0 };
        let right = if i < last { half_slot } else { 0.0 };
        positive("flap width", panel - left - right)?;

        let flap = Flap::inset(panel, width, left, right);
        strip = strip.panel(StripPanel::new(panel).top(flap.clone()).bottom(flap.mirrored()));
    }
    Ok(strip.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flaps_are_slotted() {
        let geometry = build(&RscParams::default(), 3.0).unwrap();
        let silhouette = geometry.silhouette().unwrap();
        // Both slot walls of the L|W boundary reach the body edge.
        let boundary = geometry.panels[1].x;
        let top = geometry.body.top;
        for x in [boundary - 3.0, boundary + 3.0] {
            assert!(silhouette.touches(dielinekit_core::Point::new(x, top), 1e-9));
        }
    }

    #[test]
    fn test_narrowest_panels_clear_widest_slot() {
        let params = RscParams {
            length: SCHEMA[0].min,
            width: SCHEMA[1].min,
            slot: SCHEMA[4].max,
            ..Default::default()
        };
        assert!(build(&params, 4.0).is_ok());
    }
}
