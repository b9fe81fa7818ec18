//! Run-level build summary.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PackageError, PackageResult};
use crate::packager::{BuiltPackage, PackageOptions};
use crate::publish::write_json_atomic;

/// File name of the summary written into the output directory.
pub const SUMMARY_FILE_NAME: &str = "build-summary.json";

/// What one packaging run produced and where it would be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Identity of the packaged feature.
    pub feature: SummaryFeature,
    /// Build record.
    pub build: SummaryBuild,
    /// Publish intent.
    pub registry: SummaryRegistry,
}

/// `feature` section of a [`BuildSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFeature {
    /// Feature id.
    pub id: String,
    /// Feature version.
    pub version: String,
    /// Human-readable name.
    pub name: String,
}

/// `build` section of a [`BuildSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBuild {
    /// UTC build time.
    pub date: DateTime<Utc>,
    /// Workspace the run was started from.
    pub workspace: String,
    /// Output directory.
    pub output: String,
    /// Archive file name.
    pub tarball: String,
    /// Metadata file name.
    pub metadata: String,
}

/// `registry` section of a [`BuildSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRegistry {
    /// Whether the caller asked for a publish.
    pub push_requested: bool,
    /// Registry host.
    pub registry: String,
    /// Full reference the publish would target.
    pub reference: String,
}

impl BuildSummary {
    /// Summarize a finished build.
    #[must_use]
    pub fn from_built(
        built: &BuiltPackage,
        workspace: &Path,
        output_dir: &Path,
        options: &PackageOptions,
    ) -> Self {
        let manifest = &built.metadata.manifest;
        Self {
            feature: SummaryFeature {
                id: manifest.id.clone(),
                version: manifest.version.clone(),
                name: manifest.name.clone(),
            },
            build: SummaryBuild {
                date: built.metadata.build.date,
                workspace: workspace.display().to_string(),
                output: output_dir.display().to_string(),
                tarball: built.metadata.build.tarball.clone(),
                metadata: file_name(&built.metadata_path),
            },
            registry: SummaryRegistry {
                push_requested: options.push,
                registry: built.registry.registry.clone(),
                reference: built.registry.reference(),
            },
        }
    }
}

/// Write `summaries` to `<output_dir>/build-summary.json`.
///
/// A single summary is written as an object, several as an array.
///
/// # Errors
///
/// Returns [`PackageError::Io`] or [`PackageError::Serialize`] if the file
/// cannot be written.
pub fn write_summary(summaries: &[BuildSummary], output_dir: &Path) -> PackageResult<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| PackageError::io(output_dir, e))?;
    let path = output_dir.join(SUMMARY_FILE_NAME);

    match summaries {
        [single] => write_json_atomic(&path, single)?,
        many => write_json_atomic(&path, many)?,
    }

    info!(path = %path.display(), features = summaries.len(), "Wrote build summary");
    Ok(path)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
