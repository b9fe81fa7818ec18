//! Manifest error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading a feature manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON, or a field has the wrong shape.
    #[error("malformed manifest at {path}: {message}")]
    Parse {
        /// Path to the manifest file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The manifest parsed, but its top level is not a JSON object.
    #[error("manifest at {path} is not a JSON object")]
    NotAnObject {
        /// Path to the manifest file.
        path: PathBuf,
    },
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
