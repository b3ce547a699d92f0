//! Template catalog
//!
//! The closed set of supported styles. Each variant knows its schema, its
//! dimension keys and the builder that lays it out.

use crate::builders::{
    auto_bottom::{self, AutoBottomParams},
    mailer::{self, MailerParams},
    pizza::{self, PizzaParams},
    rsc::{self, RscParams},
    sleeve::{self, SleeveParams},
    snap_lock::{self, SnapLockParams},
    tuck_end::{self, TuckEndParams, TuckLayout},
};
use crate::schema::{DimensionKeys, ParamSpec, ParameterSet};
use dielinekit_core::dimensions::check_caliper;
use dielinekit_core::{GeometryResult, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    FoldingCarton,
    Sleeve,
    Corrugated,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoldingCarton => write!(f, "Folding carton"),
            Self::Sleeve => write!(f, "Sleeve"),
            Self::Corrugated => write!(f, "Corrugated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TemplateStyle {
    StraightTuckEnd,
    ReverseTuckEnd,
    TuckTopAutoBottom,
    TuckTopSnapLock,
    Sleeve,
    Rsc0201,
    Mailer0427,
    Pizza0429,
}

/// Serializable description of a style for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub wrap_allowance: &'static str,
    pub schema: &'static [ParamSpec],
}

const BOX_DIMS: DimensionKeys = DimensionKeys {
    length: Some("L"),
    width: Some("W"),
    height: Some("H"),
};

const TUCK_DIMS: DimensionKeys = DimensionKeys {
    length: None,
    width: Some("W"),
    height: Some("H"),
};

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 8] = [
        Self::StraightTuckEnd,
        Self::ReverseTuckEnd,
        Self::TuckTopAutoBottom,
        Self::TuckTopSnapLock,
        Self::Sleeve,
        Self::Rsc0201,
        Self::Mailer0427,
        Self::Pizza0429,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::StraightTuckEnd => "ste",
            Self::ReverseTuckEnd => "rte",
            Self::TuckTopAutoBottom => "auto-bottom",
            Self::TuckTopSnapLock => "snap-lock",
            Self::Sleeve => "sleeve",
            Self::Rsc0201 => "fefco-0201",
            Self::Mailer0427 => "fefco-0427",
            Self::Pizza0429 => "fefco-0429",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StraightTuckEnd => "Straight Tuck End Carton (STE)",
            Self::ReverseTuckEnd => "Reverse Tuck End Carton (RTE)",
            Self::TuckTopAutoBottom => "Tuck Top Auto Bottom",
            Self::TuckTopSnapLock => "Tuck Top Snap Lock Bottom",
            Self::Sleeve => "Product Sleeve",
            Self::Rsc0201 => "Regular Slotted Container (FEFCO 0201)",
            Self::Mailer0427 => "Mailer (FEFCO 0427 style)",
            Self::Pizza0429 => "Pizza Box (FEFCO 0429 style)",
        }
    }

    pub fn category(self) -> TemplateCategory {
        match self {
            Self::StraightTuckEnd
            | Self::ReverseTuckEnd
            | Self::TuckTopAutoBottom
            | Self::TuckTopSnapLock => TemplateCategory::FoldingCarton,
            Self::Sleeve => TemplateCategory::Sleeve,
            Self::Rsc0201 | Self::Mailer0427 | Self::Pizza0429 => TemplateCategory::Corrugated,
        }
    }

    pub fn schema(self) -> &'static [ParamSpec] {
        match self {
            Self::StraightTuckEnd | Self::ReverseTuckEnd => tuck_end::SCHEMA,
            Self::TuckTopAutoBottom => auto_bottom::SCHEMA,
            Self::TuckTopSnapLock => snap_lock::SCHEMA,
            Self::Sleeve => sleeve::SCHEMA,
            Self::Rsc0201 => rsc::SCHEMA,
            Self::Mailer0427 => mailer::SCHEMA,
            Self::Pizza0429 => pizza::SCHEMA,
        }
    }

    pub fn dimension_keys(self) -> DimensionKeys {
        match self {
            Self::StraightTuckEnd
            | Self::ReverseTuckEnd
            | Self::TuckTopAutoBottom
            | Self::TuckTopSnapLock
            | Self::Sleeve => TUCK_DIMS,
            Self::Rsc0201 | Self::Mailer0427 | Self::Pizza0429 => BOX_DIMS,
        }
    }

    /// Calipers added to panel widths, as documented for the style.
    pub fn wrap_allowance(self) -> &'static str {
        match self {
            Self::StraightTuckEnd
            | Self::ReverseTuckEnd
            | Self::TuckTopAutoBottom
            | Self::TuckTopSnapLock => "+1 caliper per body panel",
            Self::Sleeve | Self::Rsc0201 => "+1 caliper per panel",
            Self::Mailer0427 => "+1 caliper on base, back wall and lid",
            Self::Pizza0429 => "base +1, hinge +1, lid +2 calipers",
        }
    }

    pub fn default_parameters(self) -> ParameterSet {
        ParameterSet::from_defaults(self.schema())
    }

    pub fn definition(self) -> TemplateDefinition {
        TemplateDefinition {
            id: self.id(),
            name: self.name(),
            category: self.category(),
            wrap_allowance: self.wrap_allowance(),
            schema: self.schema(),
        }
    }

    /// Lay out the style from working dimensions in millimeters.
    ///
    /// `params` must hold every schema key; bounds are checked by the caller
    /// on the requested values before dimension conversion.
    pub fn build(self, params: &ParameterSet, caliper: f64) -> Result<GeometryResult> {
        check_caliper(caliper)?;
        debug!(template = self.id(), caliper, "building dieline");

        match self {
            Self::StraightTuckEnd => {
                tuck_end::build(&TuckEndParams::from_set(params)?, TuckLayout::Straight, caliper)
            }
            Self::ReverseTuckEnd => {
                tuck_end::build(&TuckEndParams::from_set(params)?, TuckLayout::Reverse, caliper)
            }
            Self::TuckTopAutoBottom => auto_bottom::build(&AutoBottomParams::from_set(params)?, caliper),
            Self::TuckTopSnapLock => snap_lock::build(&SnapLockParams::from_set(params)?, caliper),
            Self::Sleeve => sleeve::build(&SleeveParams::from_set(params)?, caliper),
            Self::Rsc0201 => rsc::build(&RscParams::from_set(params)?, caliper),
            Self::Mailer0427 => mailer::build(&MailerParams::from_set(params)?, caliper),
            Self::Pizza0429 => pizza::build(&PizzaParams::from_set(params)?, caliper),
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.id() == wanted)
            .ok_or_else(|| format!("Unknown template: {}", s))
    }
}

impl TryFrom<String> for TemplateStyle {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TemplateStyle> for String {
    fn from(style: TemplateStyle) -> Self {
        style.id().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for style in TemplateStyle::ALL {
            assert_eq!(style.id().parse::<TemplateStyle>().unwrap(), style);
        }
        assert!("fefco-9999".parse::<TemplateStyle>().is_err());
    }

    #[test]
    fn test_schemas_are_consistent() {
        for style in TemplateStyle::ALL {
            let schema = style.schema();
            for spec in schema {
                assert!(spec.min <= spec.default && spec.default <= spec.max, "{}:{}", style, spec.key);
            }
            for (_, key) in style.dimension_keys().iter() {
                assert!(schema.iter().any(|s| s.key == key), "{} lacks {}", style, key);
            }
        }
    }

    #[test]
    fn test_build_rejects_missing_keys() {
        let params = ParameterSet::new().with("W", 80.0);
        assert!(TemplateStyle::StraightTuckEnd.build(&params, 0.3).is_err());
    }

    #[test]
    fn test_style_serializes_as_id() {
        let json = serde_json::to_string(&TemplateStyle::Rsc0201).unwrap();
        assert_eq!(json, "\"fefco-0201\"");
    }
}
