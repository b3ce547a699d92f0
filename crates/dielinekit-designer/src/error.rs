//! Error types for the designer
//!
//! - `SnapshotError`: a state snapshot could not be read or applied
//! - `ExportError`: a serializer or the archiver failed

use dielinekit_core::DielineError;
use thiserror::Error;

/// Errors raised while importing a design snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error(transparent)]
    Dieline(#[from] DielineError),
}

/// Errors raised while producing export files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("DXF error: {0}")]
    Dxf(#[from] dxf::DxfError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive entry name: {0}")]
    InvalidEntry(String),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::UnsupportedVersion {
            found: 9,
            expected: 1,
        };
        assert_eq!(err.to_string(), "Unsupported snapshot version 9 (expected 1)");

        let err: SnapshotError = DielineError::invalid_dimension("W", -1.0).into();
        assert!(err.to_string().contains("'W'"));
    }

    #[test]
    fn test_export_error_from_io() {
        let err: ExportError = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
