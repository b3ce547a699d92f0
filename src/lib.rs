//! # DielineKit
//!
//! Parametric packaging dielines: folding cartons, sleeves and corrugated
//! FEFCO styles laid out as cut, crease and perforation lines and exported
//! to SVG, DXF and ZIP production bundles.
//!
//! ## Architecture
//!
//! 1. **dielinekit-core** - Units, dimension modes, materials, geometry model
//! 2. **dielinekit-templates** - Template catalog, builders, features, preflight
//! 3. **dielinekit-designer** - Design state, vertex editing, snapshots, export
//! 4. **dielinekit-settings** - User preferences
//! 5. **dielinekit** - Command line front end

pub mod cli;

pub use dielinekit_core::{
    DielineError, DimensionMode, GeometryResult, Material, MaterialCatalog, MeasurementSystem,
};
pub use dielinekit_designer::{DesignState, ExportOptions, StatePatch};
pub use dielinekit_settings::Config;
pub use dielinekit_templates::{BuildRequest, TemplateStyle, ValidationMessage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so that documents written to stdout stay clean.
/// `RUST_LOG` refines the filter.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
