//! Packaging error types.

use std::path::PathBuf;

use devfeat_manifest::ManifestError;

/// Errors that fail a packaging run.
///
/// Any artifact left behind by a failed run must be treated as garbage.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The feature directory does not exist.
    #[error("feature directory not found: {0}")]
    FeatureDirMissing(PathBuf),

    /// The feature directory has no manifest.
    #[error("manifest not found: {0}")]
    ManifestMissing(PathBuf),

    /// The manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The manifest's id is not the expected feature name.
    #[error("feature id mismatch: expected '{expected}', manifest declares '{found}'")]
    IdMismatch {
        /// Expected feature id (the directory name).
        expected: String,
        /// Id declared in the manifest.
        found: String,
    },

    /// The manifest has no version.
    #[error("feature '{feature}' has no version")]
    MissingVersion {
        /// The feature missing a version.
        feature: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Building, reading or unpacking an archive failed.
    #[error("archive error at {path}: {message}")]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Failure description.
        message: String,
    },

    /// The archive was written but does not list a required file.
    #[error("archive {archive} is missing required entries: {}", missing.join(", "))]
    VerificationFailed {
        /// Archive path.
        archive: PathBuf,
        /// Required entries that were not found.
        missing: Vec<String>,
    },

    /// An archive entry would land outside the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry path.
        path: String,
    },

    /// Metadata could not be serialized.
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A packaging worker task failed to complete.
    #[error("packaging worker failed: {0}")]
    Worker(String),
}

impl PackageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for packaging operations.
pub type PackageResult<T> = Result<T, PackageError>;
