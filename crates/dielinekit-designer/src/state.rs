//! Design state
//!
//! A design is an immutable value. Edits are expressed as [`StatePatch`]es
//! and applied with [`DesignState::update`], which returns a new state with
//! the geometry, vertex index and preflight messages derived from scratch.
//! A rejected patch leaves the caller holding the previous state.

use crate::vertex_index::{move_vertex, SnapPolicy, VertexId, VertexIndex};
use dielinekit_core::{
    DielineError, DimensionMode, GeometryResult, Material, MeasurementSystem, Point, Result,
    Segment,
};
use dielinekit_templates::{
    generate, label_dimensions, validate, BuildRequest, Features, ParameterSet, PreflightContext,
    TemplateStyle, ValidationMessage,
};
use tracing::{debug, warn};

/// One edit to a design.
#[derive(Debug, Clone, PartialEq)]
pub enum StatePatch {
    /// Switch style; parameters reset to the new defaults.
    SelectTemplate(TemplateStyle),
    SetParameter { key: String, value: f64 },
    SetMaterial(Material),
    SetDimensionMode(DimensionMode),
    SetFeatures(Features),
    SetUnits(MeasurementSystem),
    SetBleed(f64),
    /// Horizontal perforation across the cut extents at `y`.
    InsertPerforation { y: f64 },
    ClearPerforations,
    MoveVertex { id: VertexId, to: Point, snap: SnapPolicy },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignState {
    style: TemplateStyle,
    params: ParameterSet,
    material: Material,
    dimension_mode: DimensionMode,
    features: Features,
    units: MeasurementSystem,
    bleed: f64,
    extra_perforations: Vec<f64>,
    geometry: GeometryResult,
    working: ParameterSet,
    vertices: VertexIndex,
    messages: Vec<ValidationMessage>,
}

impl DesignState {
    /// Template defaults on `material`, with the material's minimum bleed.
    pub fn new(style: TemplateStyle, material: Material) -> Result<Self> {
        let bleed = material.min_bleed();
        Self::assemble(
            style,
            style.default_parameters(),
            material,
            DimensionMode::Internal,
            Features::default(),
            MeasurementSystem::Metric,
            bleed,
            Vec::new(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        style: TemplateStyle,
        params: ParameterSet,
        material: Material,
        dimension_mode: DimensionMode,
        features: Features,
        units: MeasurementSystem,
        bleed: f64,
        extra_perforations: Vec<f64>,
    ) -> Result<Self> {
        let mut state = Self {
            style,
            params,
            material,
            dimension_mode,
            features,
            units,
            bleed,
            extra_perforations,
            geometry: GeometryResult::default(),
            working: ParameterSet::new(),
            vertices: VertexIndex::default(),
            messages: Vec::new(),
        };
        state.rebuild()?;
        Ok(state)
    }

    pub fn style(&self) -> TemplateStyle {
        self.style
    }

    /// Parameter values as entered.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Parameter values after dimension conversion.
    pub fn working(&self) -> &ParameterSet {
        &self.working
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn dimension_mode(&self) -> DimensionMode {
        self.dimension_mode
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn units(&self) -> MeasurementSystem {
        self.units
    }

    pub fn bleed(&self) -> f64 {
        self.bleed
    }

    pub fn extra_perforations(&self) -> &[f64] {
        &self.extra_perforations
    }

    pub fn geometry(&self) -> &GeometryResult {
        &self.geometry
    }

    pub fn vertices(&self) -> &VertexIndex {
        &self.vertices
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn has_failures(&self) -> bool {
        dielinekit_templates::has_failures(&self.messages)
    }

    /// Apply `patch` and derive a new state.
    pub fn update(&self, patch: StatePatch) -> Result<DesignState> {
        let mut next = self.clone();
        match patch {
            StatePatch::SelectTemplate(style) => {
                next.style = style;
                next.params = style.default_parameters();
                next.extra_perforations.clear();
            }
            StatePatch::SetParameter { key, value } => {
                if !next.params.contains(&key) {
                    return Err(reject(dielinekit_core::ParameterError::Unknown(key).into()));
                }
                next.params.set(key, value);
            }
            StatePatch::SetMaterial(material) => {
                dielinekit_core::dimensions::check_caliper(material.caliper_mm)
                    .map_err(|e| reject(e.into()))?;
                next.material = material;
            }
            StatePatch::SetDimensionMode(mode) => next.dimension_mode = mode,
            StatePatch::SetFeatures(features) => next.features = features,
            StatePatch::SetUnits(units) => next.units = units,
            StatePatch::SetBleed(bleed) => next.bleed = bleed,
            StatePatch::InsertPerforation { y } => {
                let bbox = self.geometry.bbox;
                if !(bbox.y..=bbox.bottom()).contains(&y) {
                    return Err(reject(DielineError::invalid_value(
                        "perforation",
                        format!("y {} is outside the layout {:.3}..{:.3}", y, bbox.y, bbox.bottom()),
                    )));
                }
                next.extra_perforations.push(y);
            }
            StatePatch::ClearPerforations => next.extra_perforations.clear(),
            StatePatch::MoveVertex { id, to, snap } => {
                next.apply_move(id, to, &snap).map_err(reject)?;
                return Ok(next);
            }
        }
        next.rebuild().map_err(reject)?;
        Ok(next)
    }

    /// Derive geometry, vertices and messages from the inputs.
    fn rebuild(&mut self) -> Result<()> {
        let request = BuildRequest {
            style: self.style,
            params: self.params.clone(),
            mode: self.dimension_mode,
            caliper: self.material.caliper_mm,
            features: self.features,
            units: self.units,
            bleed: self.bleed,
        };
        let dieline = generate(&request)?;
        let mut geometry = dieline.geometry;

        let bbox = geometry.bbox;
        for &y in &self.extra_perforations {
            geometry.perf.push(Segment::hline(bbox.x, bbox.right(), y));
        }
        geometry.refresh_vertices();

        self.vertices = VertexIndex::build(&geometry);
        self.geometry = geometry;
        self.working = dieline.working;
        self.revalidate();
        debug!(
            template = self.style.id(),
            material = %self.material.id,
            vertices = self.vertices.len(),
            "design rebuilt"
        );
        Ok(())
    }

    fn apply_move(&mut self, id: VertexId, to: Point, snap: &SnapPolicy) -> Result<()> {
        let (mut geometry, vertices) = move_vertex(&self.geometry, &self.vertices, id, to, snap)?;
        geometry.set_bleed(self.bleed);
        label_dimensions(&mut geometry, self.units);
        self.geometry = geometry;
        self.vertices = vertices;
        self.revalidate();
        Ok(())
    }

    fn revalidate(&mut self) {
        let context = PreflightContext {
            bleed: self.bleed,
            perforation_present: !self.geometry.perf.is_empty(),
            tongue_clearance: self.geometry.metrics.tongue_clearance,
        };
        self.messages = validate(&self.working, &self.material, &context);
    }
}

fn reject(err: DielineError) -> DielineError {
    warn!("patch rejected: {}", err);
    err
}

/// A pointer drag of one vertex.
///
/// Every `drag_to` moves the vertex from where it was when the drag began,
/// so intermediate snaps never accumulate.
#[derive(Debug, Clone)]
pub struct DragSession {
    origin: DesignState,
    current: DesignState,
    vertex: VertexId,
    snap: SnapPolicy,
}

impl DragSession {
    pub fn begin(state: &DesignState, vertex: VertexId, snap: SnapPolicy) -> Result<Self> {
        if state.vertices().get(vertex).is_none() {
            return Err(DielineError::invalid_value("vertex", format!("unknown vertex id {}", vertex)));
        }
        Ok(Self {
            origin: state.clone(),
            current: state.clone(),
            vertex,
            snap,
        })
    }

    pub fn drag_to(&mut self, to: Point) -> Result<&DesignState> {
        self.current = self.origin.update(StatePatch::MoveVertex {
            id: self.vertex,
            to,
            snap: self.snap,
        })?;
        Ok(&self.current)
    }

    pub fn current(&self) -> &DesignState {
        &self.current
    }

    /// Commit the last position.
    pub fn end(self) -> DesignState {
        self.current
    }

    /// Abandon the drag.
    pub fn cancel(self) -> DesignState {
        self.origin
    }
}
