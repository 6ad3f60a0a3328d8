//! Error types for the project store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for project store operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Project store errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// `update` for an owner that never ran `add`.
    #[error("No project found for {owner_id}")]
    NotFound { owner_id: String },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize projects: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ProjectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the "add first" case rather than a storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
