//! Per-invocation context: workspace, resolved config and feature lookup.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use devfeat_config::Config;
use devfeat_manifest::discover_feature_dirs;

use crate::output::OutputFormat;

/// A feature directory and the id it is expected to declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeatureTarget {
    pub(crate) dir: PathBuf,
    pub(crate) name: String,
}

impl FeatureTarget {
    fn from_dir(dir: PathBuf) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { dir, name }
    }
}

/// Everything a command needs besides its own arguments.
pub(crate) struct Context {
    pub(crate) workspace: PathBuf,
    pub(crate) config: Config,
    pub(crate) format: OutputFormat,
}

impl Context {
    /// Resolve `path` against the workspace unless it is absolute.
    pub(crate) fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// The features root: `--src` if given, else `features.src_dir`.
    pub(crate) fn src_dir(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(dir) => self.resolve(dir),
            None => self.resolve(&self.config.features.src_dir),
        }
    }

    /// The tests root, if one exists on disk.
    ///
    /// An explicit `--tests` is used even if missing so the caller sees the
    /// path they asked for. The configured default is used only if it
    /// exists; otherwise each feature's own `test/` directory is checked.
    pub(crate) fn tests_root(&self, flag: Option<&Path>) -> Option<PathBuf> {
        if let Some(dir) = flag {
            return Some(self.resolve(dir));
        }
        let configured = self.resolve(&self.config.features.tests_dir);
        configured.is_dir().then_some(configured)
    }

    /// The packaging output directory: `--output` if given, else `build.output_dir`.
    pub(crate) fn output_dir(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(dir) => self.resolve(dir),
            None => self.resolve(&self.config.build.output_dir),
        }
    }

    /// Turn command-line feature arguments into targets.
    ///
    /// With `all`, every directory under the features root is a target.
    /// Otherwise each name is looked up under the features root, unless it
    /// names an existing directory by path. Relative paths are taken from
    /// the workspace.
    pub(crate) fn features(
        &self,
        names: &[String],
        all: bool,
        src: Option<&Path>,
    ) -> Result<Vec<FeatureTarget>> {
        let root = self.src_dir(src);
        if all {
            let dirs = discover_feature_dirs(&root)
                .with_context(|| format!("failed to read features root {}", root.display()))?;
            return Ok(dirs.into_iter().map(FeatureTarget::from_dir).collect());
        }
        if names.is_empty() {
            bail!("no features given; pass one or more feature names or --all");
        }

        Ok(names
            .iter()
            .map(|name| {
                let as_path = Path::new(name);
                let in_workspace = self.resolve(as_path);
                let dir = if as_path.components().count() > 1 && in_workspace.is_dir() {
                    in_workspace
                } else {
                    root.join(name)
                };
                FeatureTarget::from_dir(dir)
            })
            .collect())
    }
}
