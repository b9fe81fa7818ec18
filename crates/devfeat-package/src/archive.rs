//! Deterministic feature archives.
//!
//! Archives are gzip-compressed tarballs whose entry paths are relative to
//! the feature directory. Entries are written in sorted order with
//! normalized headers (fixed mtime, zero ownership, `0755`/`0644` modes) and
//! the gzip header carries no timestamp, so identical trees produce
//! identical bytes. The top-level `install.sh` is always stored as `0755`.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use devfeat_manifest::INSTALL_SCRIPT_NAME;
use tar::{Archive, Builder, EntryType, Header, HeaderMode};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{PackageError, PackageResult};

/// One path to be archived, relative to the feature directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceEntry {
    pub(crate) relative: PathBuf,
    pub(crate) is_dir: bool,
}

impl SourceEntry {
    /// Listing form: `/`-separated, directories with a trailing `/`.
    pub(crate) fn listing(&self) -> String {
        entry_listing(&self.relative, self.is_dir)
    }
}

/// Collect every file and directory under `root`, sorted by path.
///
/// Anything at or under a path in `exclude` (typically the output directory)
/// is skipped. Symlinks are followed, so entries are also matched by their
/// canonical path; `exclude` must hold canonical paths.
pub(crate) fn collect_entries(root: &Path, exclude: &[PathBuf]) -> PackageResult<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclude));

    for entry in walker {
        let entry = entry.map_err(|e| PackageError::archive(root, e))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| PackageError::archive(root, e))?
            .to_path_buf();
        entries.push(SourceEntry {
            relative,
            is_dir: entry.file_type().is_dir(),
        });
    }

    debug!(root = %root.display(), count = entries.len(), "Collected archive entries");
    Ok(entries)
}

fn is_excluded(entry: &DirEntry, exclude: &[PathBuf]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let under = |path: &Path| exclude.iter().any(|ex| path.starts_with(ex));
    // A dangling link fails here and is reported by the walk itself.
    under(entry.path()) || entry.path().canonicalize().is_ok_and(|real| under(&real))
}

/// Write `entries` (relative to `root`) as a gzip-compressed tarball into `writer`.
pub(crate) fn write_archive<W: Write>(
    root: &Path,
    entries: &[SourceEntry],
    writer: W,
    label: &Path,
) -> PackageResult<W> {
    let encoder = GzBuilder::new().write(writer, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.mode(HeaderMode::Deterministic);
    builder.follow_symlinks(true);

    for entry in entries {
        let source = root.join(&entry.relative);
        let appended = if entry.is_dir {
            builder.append_path_with_name(&source, &entry.relative)
        } else {
            append_file(&mut builder, &source, &entry.relative)
        };
        appended.map_err(|e| {
                PackageError::archive(label, format!("failed to add {}: {e}", entry.listing()))
            })?;
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| PackageError::archive(label, format!("failed to finalize tar stream: {e}")))?;
    encoder
        .finish()
        .map_err(|e| PackageError::archive(label, format!("failed to finish gzip stream: {e}")))
}

/// Append a regular file under a deterministic header.
fn append_file<W: Write>(
    builder: &mut Builder<W>,
    source: &Path,
    relative: &Path,
) -> std::io::Result<()> {
    let mut file = File::open(source)?;
    let metadata = file.metadata()?;
    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&metadata, HeaderMode::Deterministic);
    if relative == Path::new(INSTALL_SCRIPT_NAME) {
        header.set_mode(0o755);
    }
    builder.append_data(&mut header, relative, &mut file)
}

/// List the entry paths of an archive, in archive order.
///
/// Paths are `/`-separated and relative; directories end with `/`.
///
/// # Errors
///
/// Returns [`PackageError::Archive`] if the archive cannot be opened or read.
pub fn list_archive(archive: &Path) -> PackageResult<Vec<String>> {
    let file = File::open(archive).map_err(|e| PackageError::io(archive, e))?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut listed = Vec::new();
    for entry in tar
        .entries()
        .map_err(|e| PackageError::archive(archive, format!("failed to read entries: {e}")))?
    {
        let entry =
            entry.map_err(|e| PackageError::archive(archive, format!("failed to read entry: {e}")))?;
        let is_dir = entry.header().entry_type() == EntryType::Directory;
        let path = entry
            .path()
            .map_err(|e| PackageError::archive(archive, format!("invalid entry path: {e}")))?;
        listed.push(entry_listing(&path, is_dir));
    }
    Ok(listed)
}

/// Extract an archive produced by the packager into `dest`.
///
/// Only regular files and directories are accepted; absolute paths and `..`
/// components are rejected. Returns the extracted paths.
///
/// # Errors
///
/// Returns [`PackageError::PathTraversal`] for an escaping entry and
/// [`PackageError::Archive`] for any other read or unpack failure.
pub fn unpack_archive(archive: &Path, dest: &Path) -> PackageResult<Vec<PathBuf>> {
    let file = File::open(archive).map_err(|e| PackageError::io(archive, e))?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));
    std::fs::create_dir_all(dest).map_err(|e| PackageError::io(dest, e))?;

    let mut unpacked = Vec::new();
    for entry in tar
        .entries()
        .map_err(|e| PackageError::archive(archive, format!("failed to read entries: {e}")))?
    {
        let mut entry =
            entry.map_err(|e| PackageError::archive(archive, format!("failed to read entry: {e}")))?;

        let entry_type = entry.header().entry_type();
        let path = entry
            .path()
            .map_err(|e| PackageError::archive(archive, format!("invalid entry path: {e}")))?
            .into_owned();

        if !matches!(
            entry_type,
            EntryType::Regular
                | EntryType::Directory
                | EntryType::GNULongName
                | EntryType::XHeader
                | EntryType::XGlobalHeader
        ) {
            return Err(PackageError::archive(
                archive,
                format!("unsupported entry type {entry_type:?} at {}", path.display()),
            ));
        }
        validate_entry_path(&path)?;

        let target = dest.join(&path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PackageError::io(parent, e))?;
        }
        entry.unpack(&target).map_err(|e| {
            PackageError::archive(archive, format!("failed to unpack {}: {e}", path.display()))
        })?;
        unpacked.push(target);
    }
    Ok(unpacked)
}

fn validate_entry_path(path: &Path) -> PackageResult<()> {
    let escapes = path.is_absolute()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::Prefix(_) | Component::RootDir
            )
        });
    if escapes {
        return Err(PackageError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn entry_listing(path: &Path, is_dir: bool) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let mut listing = parts.join("/");
    if is_dir {
        listing.push('/');
    }
    listing
}
