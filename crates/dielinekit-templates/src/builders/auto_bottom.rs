//! Tuck-top auto-bottom (crash-lock) carton
//!
//! The top closes like a tuck end with a full-depth tongue. The bottom is
//! four lock panels: hook trapezoids on panels 0 and 2, and triangular
//! fold panels on 1 and 3 with a diagonal crease from the body corner.
//!
//! Wrap allowance: none, as the straight tuck end.

use super::tuck_end::{tuck_closures, TuckClosures};
use super::{glue_flap, positive, Flap, Strip, StripPanel};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("W", "Panel width", 80.0, 15.0, 600.0),
    ParamSpec::new("D", "Dust flap tip", 40.0, 5.0, 400.0),
    ParamSpec::new("H", "Height", 120.0, 5.0, 800.0),
    ParamSpec::new("glue", "Glue flap", 15.0, 6.0, 40.0),
    ParamSpec::new("tuck", "Tuck flap", 18.0, 8.0, 80.0),
    ParamSpec::new("dust", "Dust flap depth", 15.0, 5.0, 120.0),
    ParamSpec::new("lock", "Lock panel depth", 30.0, 10.0, 300.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoBottomParams {
    pub width: f64,
    pub dust_tip: f64,
    pub height: f64,
    pub glue: f64,
    pub tuck: f64,
    pub dust: f64,
    pub lock: f64,
}

impl AutoBottomParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            width: set.require("W")?,
            dust_tip: set.require("D")?,
            height: set.require("H")?,
            glue: set.require("glue")?,
            tuck: set.require("tuck")?,
            dust: set.require("dust")?,
            lock: set.require("lock")?,
        })
    }
}

impl Default for AutoBottomParams {
    fn default() -> Self {
        Self {
            width: 80.0,
            dust_tip: 40.0,
            height: 120.0,
            glue: 15.0,
            tuck: 18.0,
            dust: 15.0,
            lock: 30.0,
        }
    }
}

pub fn build(params: &AutoBottomParams, caliper: f64) -> Result<GeometryResult> {
    let height = positive("H", params.height)?;
    let glue = positive("glue", params.glue)?;
    let lock = positive("lock", params.lock)?;
    let TuckClosures {
        panel,
        shoulder,
        dust,
        tuck,
    } = tuck_closures(params.width, params.dust_tip, params.dust, params.tuck, caliper)?;

    let taper = lock.min(panel / 2.0);
    let hook = Flap::tapered(panel, lock, 0.0, taper);
    let fold = Flap::tapered(panel, lock, taper, 0.0).with_crease((0.0, 0.0), (panel, lock));

    let mut geometry = Strip::new(height)
        .left(glue_flap(height, glue))
        .panel(StripPanel::new(panel).bottom(hook.clone()))
        .panel(StripPanel::new(panel).top(dust.clone()).bottom(fold.clone()))
        .panel(StripPanel::new(panel).top(tuck).bottom(hook))
        .panel(StripPanel::new(panel).top(dust).bottom(fold))
        .render();
    geometry.metrics.tongue_clearance = Some(shoulder);
    Ok(geometry)
}
