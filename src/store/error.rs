// Store error types

use std::path::PathBuf;

/// Failures of the collection store and its snapshot file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Data file missing, unreadable or unwritable
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data file content is not a JSON array of dishes
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Collection could not be serialized
    #[error("Failed to encode dishes: {0}")]
    Encode(#[source] serde_json::Error),

    /// No dish carries the identifier
    #[error("Dish {0} not found")]
    NotFound(i64),

    /// The largest identifier is already `i64::MAX`
    #[error("No identifiers left above {0}")]
    IdsExhausted(i64),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
