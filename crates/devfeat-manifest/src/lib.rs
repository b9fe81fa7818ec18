//! Devfeat Manifest - typed model for dev container features.
//!
//! A feature is a directory holding a `devcontainer-feature.json` manifest,
//! an `install.sh` script, optional documentation and an optional test
//! directory. This crate provides:
//! - [`FeatureManifest`] and [`OptionSpec`]: the declared identity and
//!   configuration surface of one feature
//! - [`BuildMetadata`]: the manifest copy emitted next to a packaged archive
//! - [`CollectionDocument`]: the aggregate of many manifests
//! - Discovery helpers for feature directories on disk
//!
//! # Example
//!
//! ```rust,no_run
//! use devfeat_manifest::{load_manifest, MANIFEST_FILE_NAME};
//!
//! # fn main() -> Result<(), devfeat_manifest::ManifestError> {
//! let manifest = load_manifest(std::path::Path::new("src/hello").join(MANIFEST_FILE_NAME))?;
//! println!("{} {}", manifest.id, manifest.version);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod collection;
mod discovery;
mod error;
mod feature;
mod metadata;

pub use collection::{CollectionDocument, SourceInformation};
pub use discovery::{
    COLLECTION_FILE_NAME, INSTALL_SCRIPT_NAME, MANIFEST_FILE_NAME, README_FILE_NAME,
    SCENARIOS_FILE_NAME, TEST_DIR_NAME, TEST_SCRIPT_NAME, discover_feature_dirs, load_manifest,
};
pub use error::{ManifestError, ManifestResult};
pub use feature::{FeatureManifest, FeatureRefs, OptionKind, OptionSpec, option_env_name};
pub use metadata::{BuildInfo, BuildMetadata};
