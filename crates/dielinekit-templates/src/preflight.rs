//! Preflight checks
//!
//! Packaging heuristics evaluated over the working parameter values and the
//! selected material. Rules always run in the same order and never stop a
//! build; a failing rule only produces a message.

use crate::schema::ParameterSet;
use dielinekit_core::{Material, MaterialCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions below this are reported as suspiciously small.
pub const MIN_PRIMARY_DIMENSION_MM: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "OK"),
            Self::Warning => write!(f, "WARN"),
            Self::Failure => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    GlueFlap,
    TuckFlap,
    TongueClearance,
    MinimumDimension,
    CreaseSpacing,
    Bleed,
    CorrugatedPerforation,
    SlotGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub passed: bool,
    pub severity: Severity,
    pub rule: RuleId,
    pub text: String,
}

impl ValidationMessage {
    fn ok(rule: RuleId, text: String) -> Self {
        Self {
            passed: true,
            severity: Severity::Info,
            rule,
            text,
        }
    }

    fn warn(rule: RuleId, text: String) -> Self {
        Self {
            passed: false,
            severity: Severity::Warning,
            rule,
            text,
        }
    }

    fn fail(rule: RuleId, text: String) -> Self {
        Self {
            passed: false,
            severity: Severity::Failure,
            rule,
            text,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}

/// Facts about the layout that are not template parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreflightContext {
    pub bleed: f64,
    pub perforation_present: bool,
    pub tongue_clearance: Option<f64>,
}

/// Minimum glue flap width for a board of the given caliper.
pub fn min_glue_flap(caliper: f64) -> f64 {
    if caliper <= 1.0 {
        (3.0 * caliper).max(10.0)
    } else {
        (4.0 * caliper).max(20.0)
    }
}

/// Minimum tuck flap length for a panel of length `basis`.
pub fn min_tuck_flap(basis: f64) -> f64 {
    (0.2 * basis).max(8.0)
}

/// Run every rule in order. Rules whose inputs are absent are skipped.
pub fn validate(
    params: &ParameterSet,
    material: &Material,
    context: &PreflightContext,
) -> Vec<ValidationMessage> {
    let caliper = material.caliper_mm;
    let mut messages = Vec::new();

    if let Some(glue) = params.get("glue") {
        let min = min_glue_flap(caliper);
        messages.push(if glue >= min {
            ValidationMessage::ok(RuleId::GlueFlap, format!("Glue flap OK (≥ {:.1} mm)", min))
        } else {
            ValidationMessage::fail(RuleId::GlueFlap, format!("Glue flap too small (< {:.1} mm)", min))
        });
    }

    if let (Some(tuck), Some(basis)) = (params.get("tuck"), params.get("L").or_else(|| params.get("W"))) {
        let min = min_tuck_flap(basis);
        messages.push(if tuck >= min {
            ValidationMessage::ok(RuleId::TuckFlap, format!("Tuck flap OK (≥ {:.0} mm)", min))
        } else {
            ValidationMessage::fail(RuleId::TuckFlap, format!("Tuck flap too small (< {:.0} mm)", min))
        });
    }

    if let Some(clearance) = context.tongue_clearance {
        let min = 2.0 * caliper + 2.0;
        if material.effective_category() == MaterialCategory::Paper && clearance < min {
            messages.push(ValidationMessage::warn(
                RuleId::TongueClearance,
                format!("Tongue clearance {:.1} mm is tight (recommended ≥ {:.1} mm)", clearance, min),
            ));
        }
    }

    for key in ["L", "W", "H"] {
        if let Some(value) = params.get(key) {
            if value < MIN_PRIMARY_DIMENSION_MM {
                messages.push(ValidationMessage::fail(
                    RuleId::MinimumDimension,
                    format!("{} looks very small (< 15 mm)", key),
                ));
            }
        }
    }

    if let Some(height) = params.get("H") {
        messages.push(if height >= 2.0 * caliper {
            ValidationMessage::ok(RuleId::CreaseSpacing, "Panel height OK vs caliper".to_string())
        } else {
            ValidationMessage::fail(
                RuleId::CreaseSpacing,
                format!(
                    "Panel height ({} mm) is close to material thickness ({} mm), risk of cracking",
                    height, caliper
                ),
            )
        });
    }

    let min_bleed = material.min_bleed();
    if context.bleed < min_bleed {
        messages.push(ValidationMessage::warn(
            RuleId::Bleed,
            format!("Bleed {:.1} mm is below the {:.0} mm minimum for this board", context.bleed, min_bleed),
        ));
    }

    if context.perforation_present && material.is_corrugated() {
        messages.push(ValidationMessage::warn(
            RuleId::CorrugatedPerforation,
            "Perforation on corrugated board may weaken structure".to_string(),
        ));
    }

    if let Some(slot) = params.get("slot") {
        if slot < 2.0 * caliper {
            messages.push(ValidationMessage::fail(
                RuleId::SlotGap,
                format!("Slot gap too small (< {:.1} mm), flaps collide at the corner", 2.0 * caliper),
            ));
        }
    }

    messages
}

pub fn has_failures(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(ValidationMessage::is_failure)
}
