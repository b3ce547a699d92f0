//! Full rebuild from requested values to a finished dieline.

use crate::catalog::TemplateStyle;
use crate::features::{apply_features, Features};
use crate::preflight::PreflightContext;
use crate::schema::{convert_parameters, ParameterSet};
use dielinekit_core::units::format_length_with_unit;
use dielinekit_core::{DielineError, DimensionLabel, DimensionMode, GeometryResult, MeasurementSystem, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Offset of the flat size labels from the layout edge.
pub const DIMENSION_LABEL_OFFSET_MM: f64 = 2.0;

/// Everything needed to lay out one dieline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub style: TemplateStyle,
    /// Values as entered, interpreted through `mode`.
    pub params: ParameterSet,
    pub mode: DimensionMode,
    pub caliper: f64,
    pub features: Features,
    pub units: MeasurementSystem,
    pub bleed: f64,
}

impl BuildRequest {
    /// Template defaults on the given board.
    pub fn new(style: TemplateStyle, caliper: f64) -> Self {
        Self {
            style,
            params: style.default_parameters(),
            mode: DimensionMode::Internal,
            caliper,
            features: Features::default(),
            units: MeasurementSystem::Metric,
            bleed: 0.0,
        }
    }
}

/// Finished geometry plus the working values the builder saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dieline {
    pub geometry: GeometryResult,
    pub working: ParameterSet,
}

impl Dieline {
    pub fn preflight_context(&self, bleed: f64) -> PreflightContext {
        PreflightContext {
            bleed,
            perforation_present: !self.geometry.perf.is_empty(),
            tongue_clearance: self.geometry.metrics.tongue_clearance,
        }
    }
}

/// Validate, convert and build.
pub fn generate(request: &BuildRequest) -> Result<Dieline> {
    request.params.validate(request.style.schema())?;
    if !request.bleed.is_finite() || request.bleed < 0.0 {
        return Err(DielineError::invalid_value("bleed", "must be zero or positive"));
    }

    let working = convert_parameters(
        &request.params,
        request.style.dimension_keys(),
        request.mode,
        request.caliper,
    )?;
    let mut geometry = request.style.build(&working, request.caliper)?;
    apply_features(&mut geometry, &request.features)?;
    geometry.set_bleed(request.bleed);
    label_dimensions(&mut geometry, request.units);
    geometry.refresh_vertices();

    debug!(
        template = request.style.id(),
        width = geometry.bbox.w,
        height = geometry.bbox.h,
        segments = geometry.segment_count(),
        "dieline generated"
    );
    Ok(Dieline { geometry, working })
}

/// Flat width above the layout, flat height at its right and each panel
/// width on the body centre line.
pub fn label_dimensions(geometry: &mut GeometryResult, units: MeasurementSystem) {
    let bbox = geometry.bbox;
    let mut dims = vec![
        DimensionLabel {
            text: format_length_with_unit(bbox.w, units),
            x: bbox.x + bbox.w / 2.0,
            y: bbox.y - DIMENSION_LABEL_OFFSET_MM,
        },
        DimensionLabel {
            text: format_length_with_unit(bbox.h, units),
            x: bbox.right() + DIMENSION_LABEL_OFFSET_MM,
            y: bbox.y + bbox.h / 2.0,
        },
    ];
    let middle = geometry.body.middle();
    dims.extend(geometry.panels.iter().map(|span| DimensionLabel {
        text: format_length_with_unit(span.width, units),
        x: span.center(),
        y: middle,
    }));
    geometry.dims = dims;
}
