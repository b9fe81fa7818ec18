//! Configuration types.
//!
//! Every section implements [`Default`] with the same values as the embedded
//! `defaults.toml`, so a bare `[section]` header still yields a working
//! configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for the devfeat toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where feature sources and tests live.
    pub features: FeaturesSection,
    /// Packaging output.
    pub build: BuildSection,
    /// Publish reference composition.
    pub registry: RegistrySection,
    /// Collection document provenance.
    pub collection: CollectionSection,
    /// Logging level and format.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Feature source layout, relative to the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesSection {
    /// Directory holding one subdirectory per feature.
    pub src_dir: String,
    /// Directory holding one test directory per feature. Used only when it
    /// exists; otherwise each feature's own `test/` directory is checked.
    pub tests_dir: String,
}

impl Default for FeaturesSection {
    fn default() -> Self {
        Self {
            src_dir: "src".to_owned(),
            tests_dir: "test".to_owned(),
        }
    }
}

/// Packaging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Directory archives and metadata are written to.
    pub output_dir: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output_dir: "dist".to_owned(),
        }
    }
}

/// Registry the publish reference points at. Nothing is pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Registry host.
    pub registry: String,
    /// Namespace within the registry.
    pub namespace: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            registry: "ghcr.io".to_owned(),
            namespace: String::new(),
        }
    }
}

/// Source information recorded in collection documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSection {
    /// Source kind.
    pub source: String,
    /// Repository identifier.
    pub repository: String,
    /// Git ref.
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Commit SHA.
    pub sha: String,
    /// Output file name.
    pub file_name: String,
}

impl Default for CollectionSection {
    fn default() -> Self {
        Self {
            source: "devfeat".to_owned(),
            repository: String::new(),
            git_ref: String::new(),
            sha: String::new(),
            file_name: "devcontainer-collection.json".to_owned(),
        }
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["devfeat_package=debug"]`).
    pub directives: Vec<String>,
    /// Where logs go: `"stderr"`, `"stdout"` or `"file"`.
    pub target: String,
    /// Log directory for the `"file"` target.
    pub directory: String,
    /// File name prefix for the `"file"` target.
    pub file_prefix: String,
    /// File rotation: `"daily"`, `"hourly"` or `"never"`.
    pub rotation: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            target: "stderr".to_owned(),
            directory: String::new(),
            file_prefix: "devfeat.log".to_owned(),
            rotation: "daily".to_owned(),
        }
    }
}
