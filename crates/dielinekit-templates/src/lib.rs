//! # DielineKit Templates
//!
//! Parametric packaging templates. Each style in [`TemplateStyle`] declares
//! a parameter schema and lays out its flat pattern as a strip of body
//! panels with closure flaps. Add-on [`features`] are layered on top and
//! [`preflight`] checks the result against packaging heuristics.
//!
//! [`generate`] runs the whole chain: schema check, dimension conversion,
//! layout, features, bleed guide and dimension labels.

pub mod builders;
pub mod catalog;
pub mod features;
pub mod pipeline;
pub mod preflight;
pub mod schema;

pub use catalog::{TemplateCategory, TemplateDefinition, TemplateStyle};
pub use features::{apply_features, Features, ThumbNotch, Window};
pub use pipeline::{generate, label_dimensions, BuildRequest, Dieline};
pub use preflight::{has_failures, validate, PreflightContext, RuleId, Severity, ValidationMessage};
pub use schema::{convert_parameters, DimensionKeys, ParamSpec, ParameterSet};
