//! Production bundle
//!
//! A ZIP archive with the SVG and DXF dielines, the design snapshot, a
//! preflight report and a manifest. Every part is produced before the
//! archive is written, so a failure never leaves a partial bundle behind.

use super::{dxf::dxf_string, svg::svg_string, ExportOptions};
use crate::error::{ExportError, ExportResult};
use crate::state::DesignState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const SVG_ENTRY: &str = "dieline.svg";
pub const DXF_ENTRY: &str = "dieline.dxf";
pub const DESIGN_ENTRY: &str = "design.json";
pub const PREFLIGHT_ENTRY: &str = "preflight.txt";
pub const MANIFEST_ENTRY: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generator: String,
    pub template: String,
    pub template_name: String,
    pub material: String,
    pub caliper_mm: f64,
    pub flat_width_mm: f64,
    pub flat_height_mm: f64,
    pub generated_at: DateTime<Utc>,
    pub failing_rules: usize,
    pub files: Vec<String>,
}

impl Manifest {
    pub fn for_state(state: &DesignState, generated_at: DateTime<Utc>) -> Self {
        let bbox = state.geometry().bbox;
        Self {
            generator: format!("dielinekit {}", env!("CARGO_PKG_VERSION")),
            template: state.style().id().to_string(),
            template_name: state.style().name().to_string(),
            material: state.material().id.to_string(),
            caliper_mm: state.material().caliper_mm,
            flat_width_mm: bbox.w,
            flat_height_mm: bbox.h,
            generated_at,
            failing_rules: state.messages().iter().filter(|m| m.is_failure()).count(),
            files: [SVG_ENTRY, DXF_ENTRY, DESIGN_ENTRY, PREFLIGHT_ENTRY]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Human readable preflight report.
pub fn preflight_report(state: &DesignState) -> String {
    let mut report = format!("Preflight: {} ({})\n", state.style().name(), state.material().name);
    for message in state.messages() {
        report.push_str(&message.to_string());
        report.push('\n');
    }
    report
}

fn add_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &[u8],
    options: SimpleFileOptions,
) -> ExportResult<()> {
    if name.contains("..") || name.starts_with('/') || name.starts_with('\\') {
        return Err(ExportError::InvalidEntry(name.to_string()));
    }
    zip.start_file(name, options)?;
    zip.write_all(content)?;
    Ok(())
}

/// Assemble the bundle in memory.
pub fn bundle_bytes(state: &DesignState, options: &ExportOptions) -> ExportResult<Vec<u8>> {
    let svg = svg_string(state.geometry(), options);
    let dxf = dxf_string(state.geometry(), options.dxf_tolerance)?;
    let design = serde_json::to_string_pretty(&state.snapshot())?;
    let report = preflight_report(state);
    let manifest = serde_json::to_string_pretty(&Manifest::for_state(state, Utc::now()))?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    add_entry(&mut zip, SVG_ENTRY, svg.as_bytes(), file_options)?;
    add_entry(&mut zip, DXF_ENTRY, dxf.as_bytes(), file_options)?;
    add_entry(&mut zip, DESIGN_ENTRY, design.as_bytes(), file_options)?;
    add_entry(&mut zip, PREFLIGHT_ENTRY, report.as_bytes(), file_options)?;
    add_entry(&mut zip, MANIFEST_ENTRY, manifest.as_bytes(), file_options)?;

    Ok(zip.finish()?.into_inner())
}

/// Write the bundle to `path`.
pub fn save_bundle(state: &DesignState, options: &ExportOptions, path: impl AsRef<Path>) -> ExportResult<()> {
    let bytes = bundle_bytes(state, options)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(path = %path.as_ref().display(), size = bytes.len(), "bundle written");
    Ok(())
}
