//! User configuration
//!
//! Preferences that shape a new design and how it is edited and exported:
//! - Design defaults (template, board, units, bleed)
//! - Editor snapping
//! - Export options
//!
//! Stored as JSON or TOML, chosen by file extension. The default location is
//! `<config dir>/dielinekit/config.toml`.

use crate::error::{SettingsError, SettingsResult};
use dielinekit_core::{init_standard_catalog, Material, MeasurementSystem, DEFAULT_FLATTEN_TOLERANCE};
use dielinekit_designer::{ExportOptions, SnapMode, SnapPolicy, DEFAULT_CAPTURE_RADIUS_MM};
use dielinekit_templates::TemplateStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub snap_mode: SnapMode,
    /// Grid pitch in millimeters.
    pub grid_step: f64,
    /// Vertex capture radius in millimeters.
    pub capture_radius: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_mode: SnapMode::Grid,
            grid_step: 1.0,
            capture_radius: DEFAULT_CAPTURE_RADIUS_MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub include_dims: bool,
    pub dxf_tolerance: f64,
    /// Base directory for relative output paths.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            include_dims: true,
            dxf_tolerance: DEFAULT_FLATTEN_TOLERANCE,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub units: MeasurementSystem,
    /// Template id used for new designs.
    pub default_template: String,
    /// Catalog id of the board used for new designs.
    pub default_material: String,
    /// Bleed used instead of the board minimum, when set.
    pub bleed_override: Option<f64>,
    pub editor: EditorSettings,
    pub export: ExportSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: MeasurementSystem::Metric,
            default_template: TemplateStyle::StraightTuckEnd.id().to_string(),
            default_material: "sbs_18pt".to_string(),
            bleed_override: None,
            editor: EditorSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(other.unwrap_or("none").to_string())),
    }
}

fn require_positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/dielinekit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dielinekit").join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no configuration directory on this platform".to_string()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Defaults when `path` does not exist yet.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating the parent directory.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        self.default_style()?;
        self.default_material()?;

        if let Some(bleed) = self.bleed_override {
            if !bleed.is_finite() || bleed < 0.0 {
                return Err(SettingsError::invalid("bleed_override", format!("must be >= 0, got {}", bleed)));
            }
        }

        require_positive("editor.grid_step", self.editor.grid_step)?;
        require_positive("editor.capture_radius", self.editor.capture_radius)?;
        require_positive("export.dxf_tolerance", self.export.dxf_tolerance)?;
        Ok(())
    }

    pub fn default_style(&self) -> SettingsResult<TemplateStyle> {
        self.default_template
            .parse()
            .map_err(|_| SettingsError::invalid("default_template", format!("unknown template '{}'", self.default_template)))
    }

    pub fn default_material(&self) -> SettingsResult<Material> {
        init_standard_catalog()
            .get_material(&self.default_material)
            .cloned()
            .ok_or_else(|| SettingsError::invalid("default_material", format!("unknown material '{}'", self.default_material)))
    }

    /// Bleed for a new design on `material`.
    pub fn bleed_for(&self, material: &Material) -> f64 {
        self.bleed_override.unwrap_or_else(|| material.min_bleed())
    }

    pub fn snap_policy(&self) -> SnapPolicy {
        SnapPolicy {
            mode: self.editor.snap_mode,
            grid_step: self.editor.grid_step,
            capture_radius: self.editor.capture_radius,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_dims: self.export.include_dims,
            dxf_tolerance: self.export.dxf_tolerance,
        }
    }

    /// Where an export named `path` is written: relative paths land in
    /// `export.output_dir` when one is set.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match &self.export.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
