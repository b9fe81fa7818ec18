//! Temporary-file-then-rename publishing of artifacts.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{PackageError, PackageResult};

/// A temporary file in `dir` that can later be renamed into place.
pub(crate) fn staging_file(dir: &Path) -> PackageResult<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".devfeat-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(|e| PackageError::io(dir, e))
}

/// Serialize `value` as pretty JSON into a staging file next to `path`.
pub(crate) fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> PackageResult<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = staging_file(dir)?;
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    staged
        .write_all(&bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| PackageError::io(staged.path(), e))?;
    Ok(staged)
}

/// Rename a staged file to its final name.
pub(crate) fn publish(staged: NamedTempFile, path: &Path) -> PackageResult<()> {
    staged
        .persist(path)
        .map_err(|e| PackageError::io(path, e.error))?;
    Ok(())
}

/// Write pretty JSON to `path` via a staging file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> PackageResult<()> {
    let staged = stage_json(path, value)?;
    publish(staged, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_atomic_leaves_no_staging_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        write_json_atomic(&path, &serde_json::json!({"a": 1})).unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.json"]);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("}\n"));
    }

    #[test]
    fn test_dropped_staging_file_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = staging_file(tmp.path()).unwrap();
        let staged_path = staged.path().to_path_buf();
        drop(staged);
        assert!(!staged_path.exists());
    }
}
