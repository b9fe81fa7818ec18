//! Feature packaging.
//!
//! A run re-checks the two identity invariants it depends on (manifest id and
//! version), archives the feature directory, verifies the archive lists the
//! required files, and emits [`BuildMetadata`] next to it. Both artifacts are
//! staged under temporary names in the output directory and renamed into
//! place only after the archive has been verified, so a failed run never
//! leaves a file under a final name.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use devfeat_manifest::{
    BuildInfo, BuildMetadata, FeatureManifest, INSTALL_SCRIPT_NAME, MANIFEST_FILE_NAME,
    README_FILE_NAME, load_manifest,
};

use crate::archive::{SourceEntry, collect_entries, list_archive, write_archive};
use crate::error::{PackageError, PackageResult};
use crate::host::build_host;
use crate::publish::{publish, stage_json, staging_file};
use crate::registry::{DEFAULT_REGISTRY, RegistryRef};
use crate::summary::SUMMARY_FILE_NAME;

/// Archive file name for a feature id: `feature-<id>.tgz`.
#[must_use]
pub fn archive_file_name(id: &str) -> String {
    format!("feature-{id}.tgz")
}

/// Metadata file name for a feature id: `<id>-metadata.json`.
#[must_use]
pub fn metadata_file_name(id: &str) -> String {
    format!("{id}-metadata.json")
}

/// Options for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// Describe the run without writing anything.
    pub dry_run: bool,
    /// Record that the caller intends to publish. No publish happens here.
    pub push: bool,
    /// Registry host used to compose the publish reference.
    pub registry: String,
    /// Registry namespace used to compose the publish reference.
    pub namespace: String,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            push: false,
            registry: DEFAULT_REGISTRY.to_owned(),
            namespace: String::new(),
        }
    }
}

/// What a dry run would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    /// Feature id.
    pub feature: String,
    /// Feature version.
    pub version: String,
    /// Archive that would be written.
    pub archive_path: PathBuf,
    /// Metadata document that would be written.
    pub metadata_path: PathBuf,
    /// Relative paths that would be archived.
    pub entries: Vec<String>,
    /// Where the feature would be published.
    pub registry: RegistryRef,
}

/// Artifacts of a finished packaging run.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPackage {
    /// The metadata document written next to the archive.
    pub metadata: BuildMetadata,
    /// Final archive path.
    pub archive_path: PathBuf,
    /// Final metadata path.
    pub metadata_path: PathBuf,
    /// Entries listed from the written archive.
    pub entries: Vec<String>,
    /// Non-fatal findings from verification.
    pub warnings: Vec<String>,
    /// Where the feature would be published.
    pub registry: RegistryRef,
}

/// Result of [`Packager::package`].
#[derive(Debug, Clone, PartialEq)]
pub enum PackageOutcome {
    /// Dry run: nothing was written.
    Planned(PackagePlan),
    /// Artifacts were written.
    Built(BuiltPackage),
}

impl PackageOutcome {
    /// Id of the feature this outcome is for.
    #[must_use]
    pub fn feature_id(&self) -> &str {
        match self {
            Self::Planned(plan) => &plan.feature,
            Self::Built(built) => &built.metadata.manifest.id,
        }
    }
}

/// One feature to package in [`Packager::package_many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageJob {
    /// Feature directory.
    pub feature_dir: PathBuf,
    /// Expected feature id.
    pub feature_name: String,
}

impl PackageJob {
    /// A job whose expected id is the directory's own name.
    pub fn from_dir(feature_dir: impl Into<PathBuf>) -> Self {
        let feature_dir = feature_dir.into();
        let feature_name = feature_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            feature_dir,
            feature_name,
        }
    }
}

/// Packages feature directories.
///
/// Holds only the build host name; runs share no mutable state.
#[derive(Debug, Clone)]
pub struct Packager {
    host: String,
}

impl Default for Packager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager {
    /// A packager recording this machine's hostname.
    #[must_use]
    pub fn new() -> Self {
        Self::with_host(build_host())
    }

    /// A packager recording `host` as the build host.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Package `feature_dir` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the directory or manifest is missing, the manifest id is not
    /// `feature_name`, the version is empty, or writing or verifying the
    /// archive fails.
    pub fn package(
        &self,
        feature_dir: &Path,
        feature_name: &str,
        output_dir: &Path,
        options: &PackageOptions,
    ) -> PackageResult<PackageOutcome> {
        let manifest = precheck(feature_dir, feature_name)?;
        let feature_root = feature_dir
            .canonicalize()
            .map_err(|e| PackageError::io(feature_dir, e))?;

        let archive_name = archive_file_name(&manifest.id);
        let archive_path = output_dir.join(&archive_name);
        let metadata_path = output_dir.join(metadata_file_name(&manifest.id));
        let registry = RegistryRef::new(
            &options.registry,
            &options.namespace,
            &manifest.id,
            &manifest.version,
        );

        if options.dry_run {
            let exclude = exclusions(&feature_root, &resolve_dir(output_dir), &manifest.id);
            let entries = collect_entries(&feature_root, &exclude)?;
            info!(
                feature = %manifest.id,
                archive = %archive_path.display(),
                entries = entries.len(),
                "Dry run: nothing written"
            );
            return Ok(PackageOutcome::Planned(PackagePlan {
                feature: manifest.id.clone(),
                version: manifest.version.clone(),
                archive_path,
                metadata_path,
                entries: entries.iter().map(SourceEntry::listing).collect(),
                registry,
            }));
        }

        std::fs::create_dir_all(output_dir).map_err(|e| PackageError::io(output_dir, e))?;
        let exclude = exclusions(&feature_root, &resolve_dir(output_dir), &manifest.id);
        let entries = collect_entries(&feature_root, &exclude)?;

        let mut staged_archive = staging_file(output_dir)?;
        write_archive(
            &feature_root,
            &entries,
            staged_archive.as_file_mut(),
            &archive_path,
        )?;
        staged_archive
            .as_file()
            .sync_all()
            .map_err(|e| PackageError::io(staged_archive.path(), e))?;

        let listed = list_archive(staged_archive.path())?;
        let warnings = verify_listing(&listed, &archive_path)?;
        for warning in &warnings {
            warn!(feature = %manifest.id, "{warning}");
        }

        let metadata = BuildMetadata::new(&manifest, BuildInfo::now(&archive_name, &self.host));
        let staged_metadata = stage_json(&metadata_path, &metadata)?;

        publish(staged_archive, &archive_path)?;
        publish(staged_metadata, &metadata_path)?;

        info!(
            feature = %manifest.id,
            version = %manifest.version,
            archive = %archive_path.display(),
            entries = listed.len(),
            "Packaged feature"
        );

        Ok(PackageOutcome::Built(BuiltPackage {
            metadata,
            archive_path,
            metadata_path,
            entries: listed,
            warnings,
            registry,
        }))
    }

    /// Package several features in parallel on blocking worker threads.
    ///
    /// Results are returned in job order. Each job writes only files named
    /// after its own feature id, so jobs do not coordinate.
    pub async fn package_many(
        &self,
        jobs: Vec<PackageJob>,
        output_dir: &Path,
        options: &PackageOptions,
    ) -> Vec<PackageResult<PackageOutcome>> {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let packager = self.clone();
                let output_dir = output_dir.to_path_buf();
                let options = options.clone();
                tokio::task::spawn_blocking(move || {
                    packager.package(&job.feature_dir, &job.feature_name, &output_dir, &options)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PackageError::Worker(e.to_string())),
            };
            results.push(result);
        }
        results
    }
}

fn precheck(feature_dir: &Path, feature_name: &str) -> PackageResult<FeatureManifest> {
    if !feature_dir.is_dir() {
        return Err(PackageError::FeatureDirMissing(feature_dir.to_path_buf()));
    }

    let manifest_path = feature_dir.join(MANIFEST_FILE_NAME);
    if !manifest_path.is_file() {
        return Err(PackageError::ManifestMissing(manifest_path));
    }

    let manifest = load_manifest(&manifest_path)?;
    if manifest.id != feature_name {
        return Err(PackageError::IdMismatch {
            expected: feature_name.to_owned(),
            found: manifest.id,
        });
    }
    if manifest.version.trim().is_empty() {
        return Err(PackageError::MissingVersion {
            feature: manifest.id,
        });
    }
    Ok(manifest)
}

/// Absolute form of `dir`, resolving symlinks when it exists.
fn resolve_dir(dir: &Path) -> PathBuf {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Paths inside the feature directory that must not be archived.
///
/// The output directory is pruned entirely, including when a symlink inside
/// the feature reaches it. When the output directory is the feature
/// directory or one of its ancestors, only this feature's artifacts are.
fn exclusions(feature_root: &Path, output_dir: &Path, id: &str) -> Vec<PathBuf> {
    if feature_root.starts_with(output_dir) {
        vec![
            output_dir.join(archive_file_name(id)),
            output_dir.join(metadata_file_name(id)),
            output_dir.join(SUMMARY_FILE_NAME),
        ]
    } else {
        debug!(output = %output_dir.display(), "Excluding output directory");
        vec![output_dir.to_path_buf()]
    }
}

/// Check the archive lists the required files. A missing README is a warning.
fn verify_listing(listed: &[String], archive_path: &Path) -> PackageResult<Vec<String>> {
    let missing: Vec<String> = [MANIFEST_FILE_NAME, INSTALL_SCRIPT_NAME]
        .into_iter()
        .filter(|required| !listed.iter().any(|entry| entry == required))
        .map(str::to_owned)
        .collect();
    if !missing.is_empty() {
        return Err(PackageError::VerificationFailed {
            archive: archive_path.to_path_buf(),
            missing,
        });
    }

    let mut warnings = Vec::new();
    if !listed.iter().any(|entry| entry == README_FILE_NAME) {
        warnings.push(format!("archive has no {README_FILE_NAME}"));
    }
    Ok(warnings)
}
