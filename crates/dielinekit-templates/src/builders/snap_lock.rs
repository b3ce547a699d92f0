//! Tuck-top snap-lock bottom carton
//!
//! Top as the auto-bottom style. The bottom alternates male panels (0, 2)
//! with a centred tab and female panels (1, 3) with a slot cut in from the
//! tip; the slot is one caliper wider than the tab on each side.
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
    ParamSpec::new("male", "Male panel depth", 25.0, 8.0, 200.0),
    ParamSpec::new("female", "Female panel depth", 22.0, 8.0, 200.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapLockParams {
    pub width: f64,
    pub dust_tip: f64,
    pub height: f64,
    pub glue: f64,
    pub tuck: f64,
    pub dust: f64,
    pub male: f64,
    pub female: f64,
}

impl SnapLockParams {
    pub fn from_set(set: &ParameterSet) -> std::result::Result<Self, ParameterError> {
        Ok(Self {
            width: set.require("W")?,
            dust_tip: set.require("D")?,
            height: set.require("H")?,
            glue: set.require("glue")?,
            tuck: set.require("tuck")?,
            dust: set.require("dust")?,
            male: set.require("male")?,
            female: set.require("female")?,
        })
    }
}

impl Default for SnapLockParams {
    fn default() -> Self {
        Self {
            width: 80.0,
            dust_tip: 40.0,
            height: 120.0,
            glue: 15.0,
            tuck: 18.0,
            dust: 15.0,
            male: 25.0,
            female: 22.0,
        }
    }
}

pub fn build(params: &SnapLockParams, caliper: f64) -> Result<GeometryResult> {
    let height = positive("H", params.height)?;
    let glue = positive("glue", params.glue)?;
    let male = positive("male", params.male)?;
    let female = positive("female", params.female)?;
    let TuckClosures {
        panel,
        shoulder,
        dust,
        tuck,
    } = tuck_closures(params.width, params.dust_tip, params.dust, params.tuck, caliper)?;

    let tab_width = panel / 3.0;
    let slot_width = tab_width + 2.0 * caliper;
    positive("female shoulder", panel - slot_width)?;

    let male_flap = Flap::with_tab(panel, male, tab_width, male / 2.0);
    let female_flap = Flap::with_slot(panel, female, slot_width, female / 2.0);

    let mut geometry = Strip::new(height)
        .left(glue_flap(height, glue))
        .panel(StripPanel::new(panel).bottom(male_flap.clone()))
        .panel(StripPanel::new(panel).top(dust.clone()).bottom(female_flap.clone()))
        .panel(StripPanel::new(panel).top(tuck).bottom(male_flap))
        .panel(StripPanel::new(panel).top(dust).bottom(female_flap))
        .render();
    geometry.metrics.tongue_clearance = Some(shoulder);
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_depth_includes_tab() {
        let geometry = build(&SnapLockParams::default(), 0.4).unwrap();
        let bottom = geometry.bbox.h - geometry.body.bottom();
        assert!((bottom - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_slot_must_fit_in_panel() {
        let params = SnapLockParams {
            width: 8.0,
            ..Default::default()
        };
        // below the schema: 8 mm panel, 2.7 mm tab, 10.7 mm slot with 4 mm board
        assert!(build(&params, 4.0).is_err());
    }

    #[test]
    fn test_narrowest_panel_fits_slot_on_thick_board() {
        let params = SnapLockParams {
            width: SCHEMA[0].min,
            ..Default::default()
        };
        assert!(build(&params, 4.0).is_ok());
    }
}
