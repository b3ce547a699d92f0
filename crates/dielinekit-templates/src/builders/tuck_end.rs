//! Straight Tuck End and Reverse Tuck End cartons
//!
//! Glue flap, then four body panels. Side panels 1 and 3 carry tapered dust
//! flaps at both ends. The tuck flaps sit on panel 2 at both ends (straight)
//! or on panel 2 at the top and panel 0 at the bottom (reverse).
//!
//! Wrap allowance: none. The flat width is exactly glue + 4W; the board
//! enters through the tongue shoulder instead.

use super::{glue_flap, positive, tongue_shoulder, wrapped, Flap, Strip, StripPanel, TUCK_CORNER_RADIUS_MM};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{clamp_radius, GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("W", "Panel width", 80.0, 15.0, 600.0),
    ParamSpec::new("D", "Dust flap tip", 40.0, 5.0, 400.0),
    ParamSpec::new("H", "Height", 120.0, 5.0, 800.0),
    ParamSpec::new("glue", "Glue flap", 15.0, 6.0, 40.0),
    ParamSpec::new("tuck", "Tuck flap", 18.0, 8.0, 80.0),
    ParamSpec::new("dust", "Dust flap depth", 15.0, 5.0, 120.0),
];

/// Calipers added to each body panel.
pub const WRAP_ALLOWANCE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TuckLayout {
    Straight,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuckEndParams {
    pub width: f64,
    pub dust_tip: f64,
    pub height: f64,
    pub glue: f64,
    pub tuck: f64,
    pub dust: f64,
}

impl TuckEndParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            width: set.require("W")?,
            dust_tip: set.require("D")?,
            height: set.require("H")?,
            glue: set.require("glue")?,
            tuck: set.require("tuck")?,
            dust: set.require("dust")?,
        })
    }
}

impl Default for TuckEndParams {
    fn default() -> Self {
        Self {
            width: 80.0,
            dust_tip: 40.0,
            height: 120.0,
            glue: 15.0,
            tuck: 18.0,
            dust: 15.0,
        }
    }
}

/// Panel width and the flaps shared by every tuck-top style.
pub(crate) struct TuckClosures {
    pub panel: f64,
    pub shoulder: f64,
    pub dust: Flap,
    pub tuck: Flap,
}

pub(crate) fn tuck_closures(
    width: f64,
    dust_tip: f64,
    dust: f64,
    tongue: f64,
    caliper: f64,
) -> Result<TuckClosures> {
    let panel = positive("W", wrapped(width, WRAP_ALLOWANCE, caliper))?;
    let dust = positive("dust", dust)?;
    let dust_tip = positive("D", dust_tip)?.min(panel);
    let tongue = positive("tuck", tongue)?;
    let shoulder = tongue_shoulder(panel, caliper);
    let tongue_width = positive("tongue width", panel - 2.0 * shoulder)?;

    let radius = clamp_radius(TUCK_CORNER_RADIUS_MM, tongue, tongue_width);
    let inset = (panel - dust_tip) / 2.0;

    Ok(TuckClosures {
        panel,
        shoulder,
        dust: Flap::tapered(panel, dust, inset, inset),
        tuck: Flap::tuck(panel, dust, tongue, shoulder, radius),
    })
}

pub fn build(params: &TuckEndParams, layout: TuckLayout, caliper: f64) -> Result<GeometryResult> {
    let height = positive("H", params.height)?;
    let glue = positive("glue", params.glue)?;
    let TuckClosures {
        panel,
        shoulder,
        dust,
        tuck,
    } = tuck_closures(params.width, params.dust_tip, params.dust, params.tuck / 2.0, caliper)?;

    let (front, back) = match layout {
        TuckLayout::Straight => (
            StripPanel::new(panel),
            StripPanel::new(panel).top(tuck.clone()).bottom(tuck),
        ),
        TuckLayout::Reverse => (
            StripPanel::new(panel).bottom(tuck.clone()),
            StripPanel::new(panel).top(tuck),
        ),
    };
    let side = StripPanel::new(panel).top(dust.clone()).bottom(dust);

    let mut geometry = Strip::new(height)
        .left(glue_flap(height, glue))
        .panel(front)
        .panel(side.clone())
        .panel(back)
        .panel(side)
        .render();
    geometry.metrics.tongue_clearance = Some(shoulder);
    Ok(geometry)
}
