//! Collection error types.

use std::path::PathBuf;

/// Errors from reading a features root or writing a collection document.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;
