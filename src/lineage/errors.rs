//! # Snapshot Error Types
//!
//! The aggregation itself never fails: dangling edge endpoints, missing
//! metadata and empty collections are all valid (if sparse) graphs. Errors
//! only arise at the boundary where a snapshot document is read and parsed.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file '{path}': {error}")]
    Read { path: String, error: String },
    #[error("Failed to parse {format} snapshot: {error}")]
    Parse { format: SnapshotFormat, error: String },
}

/// Document formats a snapshot can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension; anything but yaml/yml is JSON
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SnapshotFormat::Yaml
            }
            _ => SnapshotFormat::Json,
        }
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotFormat::Json => write!(f, "JSON"),
            SnapshotFormat::Yaml => write!(f, "YAML"),
        }
    }
}

impl SnapshotError {
    pub fn parse(format: SnapshotFormat, error: impl std::fmt::Display) -> Self {
        SnapshotError::Parse {
            format,
            error: error.to_string(),
        }
    }
}
