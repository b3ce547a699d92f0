//! Design snapshots
//!
//! Flat JSON form of everything a user chose: template, material,
//! dimension mode, units, parameters, features and bleed. Geometry is never
//! stored; it is rebuilt on import.

use crate::error::SnapshotError;
use crate::state::DesignState;
use dielinekit_core::{DielineError, DimensionMode, Material, MaterialCatalog, MaterialCategory, MeasurementSystem};
use dielinekit_templates::{Features, ParameterSet, TemplateStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Catalog entry by id, or a user-supplied caliper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialRef {
    Catalog { id: String },
    Custom { name: String, caliper_mm: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub version: u32,
    pub template: String,
    pub material: MaterialRef,
    #[serde(default)]
    pub dimension_mode: DimensionMode,
    #[serde(default)]
    pub units: MeasurementSystem,
    pub parameters: ParameterSet,
    #[serde(default)]
    pub features: Features,
    pub bleed: f64,
    #[serde(default)]
    pub extra_perforations: Vec<f64>,
}

impl DesignSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl MaterialRef {
    fn resolve(&self, catalog: &MaterialCatalog) -> Result<Material, SnapshotError> {
        match self {
            Self::Catalog { id } => catalog
                .get_material(id)
                .cloned()
                .ok_or_else(|| SnapshotError::UnknownMaterial(id.clone())),
            Self::Custom { name, caliper_mm } => {
                Ok(Material::custom(name, *caliper_mm).map_err(DielineError::from)?)
            }
        }
    }
}

impl DesignState {
    pub fn snapshot(&self) -> DesignSnapshot {
        let material = self.material();
        DesignSnapshot {
            version: SNAPSHOT_VERSION,
            template: self.style().id().to_string(),
            material: match material.category {
                MaterialCategory::Custom => MaterialRef::Custom {
                    name: material.name.clone(),
                    caliper_mm: material.caliper_mm,
                },
                _ => MaterialRef::Catalog {
                    id: material.id.0.clone(),
                },
            },
            dimension_mode: self.dimension_mode(),
            units: self.units(),
            parameters: self.params().clone(),
            features: *self.features(),
            bleed: self.bleed(),
            extra_perforations: self.extra_perforations().to_vec(),
        }
    }

    /// Rebuild a design from a snapshot, checking every field first.
    pub fn from_snapshot(snapshot: &DesignSnapshot, catalog: &MaterialCatalog) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let style: TemplateStyle = snapshot
            .template
            .parse()
            .map_err(|_| SnapshotError::UnknownTemplate(snapshot.template.clone()))?;
        let material = snapshot.material.resolve(catalog)?;
        snapshot
            .parameters
            .validate(style.schema())
            .map_err(DielineError::from)?;

        let state = DesignState::assemble(
            style,
            snapshot.parameters.clone(),
            material,
            snapshot.dimension_mode,
            snapshot.features,
            snapshot.units,
            snapshot.bleed,
            snapshot.extra_perforations.clone(),
        )?;
        info!(template = style.id(), "design imported");
        Ok(state)
    }

    /// Parse and apply a JSON snapshot. On error `self` is unaffected.
    pub fn import_json(&self, json: &str, catalog: &MaterialCatalog) -> Result<Self, SnapshotError> {
        Self::from_snapshot(&DesignSnapshot::from_json(json)?, catalog)
    }
}
