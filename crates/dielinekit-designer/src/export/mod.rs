//! Export serializers
//!
//! - SVG with one group per layer
//! - DXF with LINE entities on named layers
//! - ZIP production bundle holding both plus the design and preflight report
//!
//! Every serializer works on a finished geometry snapshot and either
//! produces the whole file or fails.

pub mod bundle;
pub mod dxf;
pub mod svg;

use dielinekit_core::DEFAULT_FLATTEN_TOLERANCE;
use serde::{Deserialize, Serialize};

pub use bundle::{bundle_bytes, save_bundle, Manifest};
pub use dxf::{dxf_string, write_dxf};
pub use svg::svg_string;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Emit the DIMS text group in SVG output.
    pub include_dims: bool,
    /// Chord tolerance for arcs written as DXF lines.
    pub dxf_tolerance: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_dims: true,
            dxf_tolerance: DEFAULT_FLATTEN_TOLERANCE,
        }
    }
}
