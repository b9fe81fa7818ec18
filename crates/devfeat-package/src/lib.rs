//! Devfeat Package - deterministic archives and build metadata for features.
//!
//! Packaging a feature directory produces:
//! - `feature-<id>.tgz`: the directory tree with relative paths, byte-identical
//!   across runs on identical inputs
//! - `<id>-metadata.json`: the manifest plus a `build` record
//!
//! A run-level [`BuildSummary`] can be written next to them. Publishing is
//! not performed; [`RegistryRef`] only describes where a feature would go.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use devfeat_package::{PackageOptions, PackageOutcome, Packager};
//!
//! # fn main() -> Result<(), devfeat_package::PackageError> {
//! let packager = Packager::new();
//! let outcome = packager.package(
//!     Path::new("src/hello-world"),
//!     "hello-world",
//!     Path::new("dist"),
//!     &PackageOptions::default(),
//! )?;
//! if let PackageOutcome::Built(built) = outcome {
//!     println!("wrote {}", built.archive_path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod archive;
mod error;
mod host;
mod packager;
mod publish;
mod registry;
mod summary;

pub use archive::{list_archive, unpack_archive};
pub use error::{PackageError, PackageResult};
pub use host::build_host;
pub use packager::{
    BuiltPackage, PackageJob, PackageOptions, PackageOutcome, PackagePlan, Packager,
    archive_file_name, metadata_file_name,
};
pub use registry::{DEFAULT_REGISTRY, RegistryRef};
pub use summary::{
    BuildSummary, SUMMARY_FILE_NAME, SummaryBuild, SummaryFeature, SummaryRegistry, write_summary,
};
