//! Corrugated pizza box (FEFCO 0429 style)
//!
//! Strip: front wall H, base W, hinge wall H, lid W, with the lid tab on
//! the right edge. Body band is the box length L. The lid tab is tapered by
//! a third of its depth at each corner, limited to a quarter of L.
//!
//! Wrap allowance: base +1 caliper, hinge +1 caliper, lid +2 calipers.

use super::{positive, wrapped, Flap, Strip, StripPanel};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("L", "Length", 300.0, 10.0, 800.0),
    ParamSpec::new("W", "Width", 300.0, 10.0, 800.0),
    ParamSpec::new("H", "Height", 40.0, 15.0, 120.0),
    ParamSpec::new("tab", "Lid tab", 25.0, 10.0, 80.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PizzaParams {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub tab: f64,
}

impl PizzaParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            length: set.require("L")?,
            width: set.require("W")?,
            height: set.require("H")?,
            tab: set.require("tab")?,
        })
    }
}

impl Default for PizzaParams {
    fn default() -> Self {
        Self {
            length: 300.0,
            width: 300.0,
            height: 40.0,
            tab: 25.0,
        }
    }
}

pub fn build(params: &PizzaParams, caliper: f64) -> Result<GeometryResult> {
    let length = positive("L", params.length)?;
    let height = positive("H", params.height)?;
    let tab = positive("tab", params.tab)?;
    let base = positive("W", wrapped(params.width, 1.0, caliper))?;
    let hinge = wrapped(height, 1.0, caliper);
    let lid = positive("W", wrapped(params.width, 2.0, caliper))?;
    let lid_depth = positive("lid flap", height - 2.0 * caliper)?;

    // 45 degree ears
    let front_ear = Flap::tapered(height, height, height, 0.0);
    let hinge_ear = Flap::tapered(hinge, height, 0.0, height.min(hinge));
    let wall = Flap::rect(base, height);
    let lid_taper = (lid_depth / 2.0).min(lid / 4.0);
    let lid_flap = Flap::tapered(lid, lid_depth, lid_taper, lid_taper);
    let tab_taper = (tab / 3.0).min(length / 4.0);

    Ok(Strip::new(length)
        .panel(StripPanel::new(height).top(front_ear.clone()).bottom(front_ear.mirrored()))
        .panel(StripPanel::new(base).top(wall.clone()).bottom(wall))
        .panel(StripPanel::new(hinge).top(hinge_ear.clone()).bottom(hinge_ear.mirrored()))
        .panel(StripPanel::new(lid).top(lid_flap.clone()).bottom(lid_flap))
        .right(Flap::tapered(length, tab, tab_taper, tab_taper))
        .render())
}
