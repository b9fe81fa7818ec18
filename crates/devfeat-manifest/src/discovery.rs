//! Feature directory layout and discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::feature::FeatureManifest;

/// Manifest file name inside a feature directory.
pub const MANIFEST_FILE_NAME: &str = "devcontainer-feature.json";

/// Install script file name inside a feature directory.
pub const INSTALL_SCRIPT_NAME: &str = "install.sh";

/// Documentation file name inside a feature directory.
pub const README_FILE_NAME: &str = "README.md";

/// Test directory name inside a feature directory.
pub const TEST_DIR_NAME: &str = "test";

/// Test script file name inside a test directory.
pub const TEST_SCRIPT_NAME: &str = "test.sh";

/// Scenarios document file name inside a test directory.
pub const SCENARIOS_FILE_NAME: &str = "scenarios.json";

/// Default file name of an emitted collection document.
pub const COLLECTION_FILE_NAME: &str = "devcontainer-collection.json";

/// Load a single feature manifest from a JSON file.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, otherwise the
/// parse errors of [`FeatureManifest::from_json_str`].
pub fn load_manifest(path: impl AsRef<Path>) -> ManifestResult<FeatureManifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let manifest = FeatureManifest::from_json_str(&content, path)?;
    debug!(path = %path.display(), feature_id = %manifest.id, "Loaded feature manifest");
    Ok(manifest)
}

/// List the candidate feature directories directly under `root`.
///
/// Hidden directories are skipped. The result is sorted lexicographically by
/// directory name so every caller sees the same order. Whether a directory
/// actually holds a manifest is left to the caller.
///
/// # Errors
///
/// Returns an I/O error if `root` cannot be read.
pub fn discover_feature_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_dir() && !hidden {
            dirs.push(path);
        }
    }
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(root = %root.display(), count = dirs.len(), "Discovered feature directories");
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorted_and_skips_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["zsh", "alpha", ".git", "node"] {
            std::fs::create_dir(tmp.path().join(name)).unwrap();
        }
        std::fs::write(tmp.path().join("README.md"), "not a dir").unwrap();

        let dirs = discover_feature_dirs(tmp.path()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha", "node", "zsh"]);
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_manifest(tmp.path().join(MANIFEST_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn test_load_manifest_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&path, r#"{"id": "hello", "version": "1.0.0", "name": "Hello"}"#).unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.name, "Hello");
    }
}
