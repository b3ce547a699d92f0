//! DielineKit Settings Crate
//!
//! Loads, validates and saves user preferences.

pub mod config;
pub mod error;

pub use config::{Config, EditorSettings, ExportSettings};
pub use error::{SettingsError, SettingsResult};
