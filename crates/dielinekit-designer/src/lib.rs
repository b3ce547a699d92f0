//! # DielineKit Designer
//!
//! Interactive editing on top of the template pipeline.
//!
//! ## Components
//!
//! - **State**: immutable [`DesignState`] values updated through [`StatePatch`]es
//! - **Vertex index**: deduplicated endpoints with grid and vertex snapping
//! - **Drag sessions**: pointer drags that always restart from the origin state
//! - **Snapshots**: versioned JSON form of a design
//! - **Export**: SVG, DXF and the ZIP production bundle
//!
//! ```text
//! StatePatch ──> DesignState::update ──> generate ──> GeometryResult
//!                      │                                   │
//!                      └── preflight messages   VertexIndex┘
//! ```

pub mod error;
pub mod export;
pub mod snapshot;
pub mod state;
pub mod vertex_index;

pub use error::{ExportError, ExportResult, SnapshotError};
pub use export::{bundle_bytes, dxf_string, save_bundle, svg_string, write_dxf, ExportOptions, Manifest};
pub use snapshot::{DesignSnapshot, MaterialRef, SNAPSHOT_VERSION};
pub use state::{DesignState, DragSession, StatePatch};
pub use vertex_index::{move_vertex, SnapMode, SnapPolicy, VertexId, VertexIndex, DEFAULT_CAPTURE_RADIUS_MM};
