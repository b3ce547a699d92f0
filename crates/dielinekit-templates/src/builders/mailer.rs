//! Corrugated mailer (FEFCO 0427 style)
//!
//! Strip: front wall H, base W, back wall H, lid W, with the lid tuck on
//! the right edge. The body band is the box length L.
//!
//! - base: double side walls, outer depth H, roll-over crease, inner depth H - 2c
//! - front and back: dust ears of depth H - c, tapered on the outer side
//! - lid: lid flaps of depth H - 2c
//! - tuck: radiused outer corners
//!
//! Wrap allowance: +1 caliper on base, back wall and lid (3 calipers total).

use super::{positive, wrapped, Flap, Strip, StripPanel};
use crate::schema::{ParamSpec, ParameterSet};
use dielinekit_core::{clamp_radius, GeometryResult, ParameterError, Result};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec::new("L", "Length", 200.0, 10.0, 1200.0),
    ParamSpec::new("W", "Width", 120.0, 10.0, 1000.0),
    ParamSpec::new("H", "Height", 60.0, 15.0, 600.0),
    ParamSpec::new("tuck", "Lid tuck", 40.0, 10.0, 120.0),
];

const TUCK_RADIUS_MM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MailerParams {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub tuck: f64,
}

impl MailerParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            length: set.require("L")?,
            width: set.require("W")?,
            height: set.require("H")?,
            tuck: set.require("tuck")?,
        })
    }
}

impl Default for MailerParams {
    fn default() -> Self {
        Self {
            length: 200.0,
            width: 120.0,
            height: 60.0,
            tuck: 40.0,
        }
    }
}

pub fn build(params: &MailerParams, caliper: f64) -> Result<GeometryResult> {
    let length = positive("L", params.length)?;
    let height = positive("H", params.height)?;
    let tuck = positive("tuck", params.tuck)?;
    let base = positive("W", wrapped(params.width, 1.0, caliper))?;
    let back = wrapped(height, 1.0, caliper);
    let lid = base;

    let inner = positive("inner wall", height - 2.0 * caliper)?;
    let ear = positive("dust ear", height - caliper)?;

    let wall_taper = (inner / 2.0).min(base / 4.0);
    let side_wall = Flap::polyline(
        base,
        &[
            (0.0, height),
            (wall_taper, height + inner),
            (base - wall_taper, height + inner),
            (base, height),
            (base, 0.0),
        ],
    )
    .with_crease((0.0, height), (base, height));

    let front_ear = Flap::tapered(height, ear, ear.min(height / 2.0), 0.0);
    let back_ear = Flap::tapered(back, ear, 0.0, ear.min(back / 2.0));
    let lid_taper = (inner / 2.0).min(lid / 4.0);
    let lid_flap = Flap::tapered(lid, inner, lid_taper, lid_taper);
    let radius = clamp_radius(TUCK_RADIUS_MM, tuck, length);

    Ok(Strip::new(length)
        .panel(StripPanel::new(height).top(front_ear.clone()).bottom(front_ear.mirrored()))
        .panel(StripPanel::new(base).top(side_wall.clone()).bottom(side_wall))
        .panel(StripPanel::new(back).top(back_ear.clone()).bottom(back_ear.mirrored()))
        .panel(StripPanel::new(lid).top(lid_flap.clone()).bottom(lid_flap))
        .right(Flap::tuck(length, 0.0, tuck, 0.0, radius))
        .render())
}
