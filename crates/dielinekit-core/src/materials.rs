//! Material catalog
//!
//! This module provides:
//! - Material categories (paperboard, corrugated, custom)
//! - Material records carrying the caliper used by every allowance formula
//! - The standard catalog of board grades

use crate::dimensions::check_caliper;
use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Calipers at or below this value behave like folding carton board.
pub const PAPER_CALIPER_LIMIT_MM: f64 = 1.0;

/// Material categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    /// Folding carton board and heavy paper
    Paper,
    /// Corrugated board (E, B, C flute)
    Corrugated,
    /// User supplied caliper
    Custom,
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paper => write!(f, "Paper"),
            Self::Corrugated => write!(f, "Corrugated"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// Unique material identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub String);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A board grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Thickness in millimeters
    pub caliper_mm: f64,
    pub category: MaterialCategory,
    #[serde(default)]
    pub description: String,
}

impl Material {
    /// Create a new material
    pub fn new(id: MaterialId, name: String, caliper_mm: f64, category: MaterialCategory) -> Self {
        Self {
            id,
            name,
            caliper_mm,
            category,
            description: String::new(),
        }
    }

    /// A user-defined material. The caliper must be finite and positive.
    pub fn custom(name: &str, caliper_mm: f64) -> Result<Self, ParameterError> {
        check_caliper(caliper_mm)?;
        Ok(Self::new(
            MaterialId("custom".to_string()),
            name.to_string(),
            caliper_mm,
            MaterialCategory::Custom,
        ))
    }

    /// Category used by category-dependent rules; custom board is judged by caliper.
    pub fn effective_category(&self) -> MaterialCategory {
        match self.category {
            MaterialCategory::Custom if self.caliper_mm <= PAPER_CALIPER_LIMIT_MM => {
                MaterialCategory::Paper
            }
            MaterialCategory::Custom => MaterialCategory::Corrugated,
            other => other,
        }
    }

    pub fn is_corrugated(&self) -> bool {
        self.effective_category() == MaterialCategory::Corrugated
    }

    /// Minimum bleed for the material: 3 mm paper, 5 mm corrugated.
    pub fn min_bleed(&self) -> f64 {
        if self.is_corrugated() {
            5.0
        } else {
            3.0
        }
    }
}

/// Ordered collection of materials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
}

impl MaterialCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material, replacing any entry with the same id
    pub fn add_material(&mut self, material: Material) {
        match self.materials.iter_mut().find(|m| m.id == material.id) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
    }

    /// Get a material by id
    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id.0 == id)
    }

    /// All materials in insertion order
    pub fn get_all_materials(&self) -> &[Material] {
        &self.materials
    }

    /// All materials in a category
    pub fn get_materials_by_category(&self, category: MaterialCategory) -> Vec<&Material> {
        self.materials
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Search materials by name (partial match, case-insensitive)
    pub fn search_by_name(&self, query: &str) -> Vec<&Material> {
        let query_lower = query.to_lowercase();
        self.materials
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Initialize the standard catalog of board grades
pub fn init_standard_catalog() -> MaterialCatalog {
    let mut catalog = MaterialCatalog::new();

    let grades: [(&str, &str, f64, MaterialCategory, &str); 8] = [
        ("paper_250gsm", "Paperboard 250 gsm", 0.30, MaterialCategory::Paper, "Light folding carton"),
        ("paper_300gsm", "Paperboard 300 gsm", 0.40, MaterialCategory::Paper, "General retail carton"),
        ("paper_400gsm", "Paperboard 400 gsm", 0.55, MaterialCategory::Paper, "Heavy folding carton"),
        ("sbs_18pt", "SBS 18 pt", 0.457, MaterialCategory::Paper, "Solid bleached sulfate, 0.018 in"),
        ("sbs_20pt", "SBS 20 pt", 0.508, MaterialCategory::Paper, "Solid bleached sulfate, 0.020 in"),
        ("corr_e", "Corrugated E-flute", 1.50, MaterialCategory::Corrugated, "Retail-ready and mailer board"),
        ("corr_b", "Corrugated B-flute", 3.00, MaterialCategory::Corrugated, "Shipping cases"),
        ("corr_c", "Corrugated C-flute", 4.00, MaterialCategory::Corrugated, "Heavy shipping cases"),
    ];

    for (id, name, caliper, category, description) in grades {
        let mut material = Material::new(MaterialId(id.to_string()), name.to_string(), caliper, category);
        material.description = description.to_string();
        catalog.add_material(material);
    }

    catalog
}
