//! Manifest aggregation.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use devfeat_manifest::{
    CollectionDocument, MANIFEST_FILE_NAME, SourceInformation, discover_feature_dirs,
    load_manifest,
};

use crate::error::{CollectionError, CollectionResult};

/// Build a collection from `dirs`, keeping their order.
///
/// Directories without a manifest are skipped. Directories whose manifest
/// does not parse are skipped with a warning. Never fails.
pub fn aggregate<I, P>(dirs: I, source_information: SourceInformation) -> CollectionDocument
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut doc = CollectionDocument::new(source_information);
    for dir in dirs {
        let manifest_path = dir.as_ref().join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            debug!(dir = %dir.as_ref().display(), "No manifest, skipping");
            continue;
        }
        match load_manifest(&manifest_path) {
            Ok(manifest) => doc.features.push(manifest),
            Err(e) => warn!(path = %manifest_path.display(), error = %e, "Skipping unparseable manifest"),
        }
    }

    let duplicates = doc.duplicate_ids();
    if !duplicates.is_empty() {
        warn!(ids = ?duplicates, "Collection declares duplicate feature ids");
    }
    info!(features = doc.features.len(), "Aggregated collection");
    doc
}

/// Build a collection from every feature directory directly under `root`.
///
/// # Errors
///
/// Returns [`CollectionError::Io`] if `root` cannot be read.
pub fn aggregate_root(
    root: &Path,
    source_information: SourceInformation,
) -> CollectionResult<CollectionDocument> {
    let dirs = discover_feature_dirs(root).map_err(|e| CollectionError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    Ok(aggregate(dirs, source_information))
}

/// Write `doc` as pretty JSON to `path`.
///
/// The document is staged next to `path`, synced, and renamed into place,
/// so readers never see a partial file.
///
/// # Errors
///
/// Returns [`CollectionError`] if the document cannot be serialized or written.
pub fn write_collection(doc: &CollectionDocument, path: &Path) -> CollectionResult<()> {
    let io_err = |source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut bytes = serde_json::to_vec_pretty(doc)?;
    bytes.push(b'\n');

    let mut staged = tempfile::Builder::new()
        .prefix(".devfeat-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(io_err)?;
    staged.write_all(&bytes).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;

    info!(path = %path.display(), features = doc.features.len(), "Wrote collection");
    Ok(())
}
