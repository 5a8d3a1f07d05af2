//! Error types for catalog access

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid course code: {0:?}")]
    InvalidCode(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog document {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog fetch was interrupted")]
    Interrupted,
}

impl CatalogError {
    /// Whether this failure means "the document is not there".
    ///
    /// Unavailable documents send the visitor back to the index; malformed
    /// ones are left to propagate.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, CatalogError::Malformed { .. })
    }
}
