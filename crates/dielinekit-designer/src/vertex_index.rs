//! Vertex/segment index
//!
//! Segment endpoints are deduplicated by [`VertexKey`] so that coincident
//! ends on the cut, crease and perforation layers share one editable handle.
//! Moving a handle moves every endpoint that resolved to it, so panels
//! cannot be torn apart by a drag.

use dielinekit_core::{
    DielineError, GeometryResult, Layer, Point, Result, VertexKey, DEFAULT_FLATTEN_TOLERANCE,
    POINT_EPSILON,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Dense vertex id, assigned in first-seen order.
pub type VertexId = usize;

/// Default distance within which a dragged vertex captures another.
pub const DEFAULT_CAPTURE_RADIUS_MM: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// Round to the nearest grid step.
    Grid,
    /// Capture the nearest other vertex within the capture radius.
    Vertex,
    #[default]
    Off,
}

impl fmt::Display for SnapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::Vertex => write!(f, "vertex"),
            Self::Off => write!(f, "off"),
        }
    }
}

impl FromStr for SnapMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "vertex" => Ok(Self::Vertex),
            "off" | "none" => Ok(Self::Off),
            _ => Err(format!("Unknown snap mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPolicy {
    pub mode: SnapMode,
    pub grid_step: f64,
    pub capture_radius: f64,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self {
            mode: SnapMode::Off,
            grid_step: 1.0,
            capture_radius: DEFAULT_CAPTURE_RADIUS_MM,
        }
    }
}

impl SnapPolicy {
    pub fn grid(step: f64) -> Self {
        Self {
            mode: SnapMode::Grid,
            grid_step: step,
            ..Default::default()
        }
    }

    pub fn vertex(capture_radius: f64) -> Self {
        Self {
            mode: SnapMode::Vertex,
            capture_radius,
            ..Default::default()
        }
    }

    /// Where a vertex dragged to `target` lands. `dragged` is never a snap target.
    pub fn apply(&self, target: Point, index: &VertexIndex, dragged: Option<VertexId>) -> Point {
        match self.mode {
            SnapMode::Off => target,
            SnapMode::Grid if self.grid_step > 0.0 => Point::new(
                (target.x / self.grid_step).round() * self.grid_step,
                (target.y / self.grid_step).round() * self.grid_step,
            ),
            SnapMode::Grid => target,
            SnapMode::Vertex => index
                .nearest(target, self.capture_radius, dragged)
                .map_or(target, |(_, p)| p),
        }
    }
}

/// Deduplicated endpoints of the physical layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexIndex {
    vertices: Vec<Point>,
    lookup: HashMap<VertexKey, VertexId>,
}

impl VertexIndex {
    /// Index the cut, crease and perforation endpoints, in that order.
    pub fn build(geometry: &GeometryResult) -> Self {
        let mut index = Self::default();
        for (_, segment) in geometry.editable_segments() {
            for p in segment.endpoints() {
                let key = VertexKey::of(p);
                if !index.lookup.contains_key(&key) {
                    index.lookup.insert(key, index.vertices.len());
                    index.vertices.push(p);
                }
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, id: VertexId) -> Option<Point> {
        self.vertices.get(id).copied()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The vertex an endpoint resolves to.
    pub fn id_of(&self, p: Point) -> Option<VertexId> {
        self.lookup.get(&VertexKey::of(p)).copied()
    }

    /// Closest vertex within `radius` of `p`, ignoring `exclude`.
    pub fn nearest(&self, p: Point, radius: f64, exclude: Option<VertexId>) -> Option<(VertexId, Point)> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(id, _)| Some(*id) != exclude)
            .map(|(id, v)| (id, *v, v.distance(p)))
            .filter(|(_, _, d)| *d <= radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, v, _)| (id, v))
    }
}

/// Move one vertex and every endpoint sharing it.
///
/// Returns the edited geometry and its rebuilt index; the input is left
/// untouched. The bleed guide is not an editable layer and is kept as is.
pub fn move_vertex(
    geometry: &GeometryResult,
    index: &VertexIndex,
    id: VertexId,
    to: Point,
    snap: &SnapPolicy,
) -> Result<(GeometryResult, VertexIndex)> {
    let old = index.get(id).ok_or_else(|| {
        DielineError::invalid_value("vertex", format!("unknown vertex id {} (have {})", id, index.len()))
    })?;
    let new = snap.apply(to, index, Some(id));
    let key = VertexKey::of(old);
    let shares = |p: Point| VertexKey::of(p) == key || p.approx_eq(old, POINT_EPSILON);

    let mut moved = geometry.clone();
    for layer in [Layer::Cut, Layer::Crease, Layer::Perforation] {
        let segments = moved.layer_mut(layer);
        *segments = segments
            .iter()
            .map(|s| s.map_points(|p| if shares(p) { new } else { p }))
            .collect();
    }
    moved.refresh_bbox(DEFAULT_FLATTEN_TOLERANCE);
    moved.refresh_vertices();

    debug!(vertex = id, from = %old, to = %new, "vertex moved");
    let index = VertexIndex::build(&moved);
    Ok((moved, index))
}
