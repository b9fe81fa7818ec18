//! Build metadata emitted alongside a packaged feature archive.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::feature::FeatureManifest;

/// A copy of the feature manifest plus a `build` record.
///
/// One instance per packaging run; never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// The manifest, flattened into the top level of the document.
    #[serde(flatten)]
    pub manifest: FeatureManifest,
    /// Where and when this build happened.
    pub build: BuildInfo,
}

impl BuildMetadata {
    /// Derive metadata from a manifest.
    ///
    /// A `build` key carried in the manifest's pass-through fields is
    /// replaced by `build`.
    #[must_use]
    pub fn new(manifest: &FeatureManifest, build: BuildInfo) -> Self {
        let mut manifest = manifest.clone();
        manifest.extra.remove("build");
        Self { manifest, build }
    }
}

/// The `build` sub-record of [`BuildMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// File name of the archive this metadata describes.
    pub tarball: String,
    /// UTC build time, second precision.
    pub date: DateTime<Utc>,
    /// Host identifier of the machine that built the archive.
    pub host: String,
}

impl BuildInfo {
    /// Build info stamped with the current UTC time.
    #[must_use]
    pub fn now(tarball: impl Into<String>, host: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            tarball: tarball.into(),
            date: now.with_nanosecond(0).unwrap_or(now),
            host: host.into(),
        }
    }
}
