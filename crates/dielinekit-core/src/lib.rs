//! # DielineKit Core
//!
//! Core types shared by every DielineKit crate.
//! Provides the error taxonomy, unit handling, the dimension converter,
//! the material catalog and the flat-pattern geometry model that the
//! template builders produce and the designer consumes.

pub mod dimensions;
pub mod error;
pub mod geometry;
pub mod materials;
pub mod units;

pub use dimensions::{to_canonical, to_external, Axis, DimensionMode, Dimensions};
pub use error::{DielineError, ParameterError, Result};
pub use geometry::{
    clamp_radius, BodyBand, BoundingBox, DimensionLabel, GeometryResult, Layer, LayoutMetrics,
    PanelSpan, PathCommand, Point, Segment, VertexKey, DEFAULT_FLATTEN_TOLERANCE, POINT_EPSILON,
};
pub use materials::{init_standard_catalog, Material, MaterialCatalog, MaterialCategory, MaterialId};
pub use units::MeasurementSystem;
