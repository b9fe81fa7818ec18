//! Collection document types.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::feature::FeatureManifest;

/// Aggregate of every feature manifest in a repository, used for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDocument {
    /// Where the collection was built from.
    pub source_information: SourceInformation,
    /// Manifests in directory enumeration order. Not de-duplicated by id.
    pub features: Vec<FeatureManifest>,
}

impl CollectionDocument {
    /// An empty collection for `source_information`.
    #[must_use]
    pub fn new(source_information: SourceInformation) -> Self {
        Self {
            source_information,
            features: Vec::new(),
        }
    }

    /// Ids declared by more than one feature, in first-seen order.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for feature in &self.features {
            let id = feature.id.as_str();
            if !seen.insert(id) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}

/// Provenance of a collection build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInformation {
    /// Source kind, e.g. `"devfeat"` or `"github"`.
    pub source: String,
    /// Repository identifier (`owner/name` or URL).
    pub repository: String,
    /// Git ref the collection was built from.
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Commit SHA the collection was built from.
    pub sha: String,
    /// UTC time the collection was built.
    pub timestamp: DateTime<Utc>,
}

impl SourceInformation {
    /// Source information stamped with the current UTC time.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        repository: impl Into<String>,
        git_ref: impl Into<String>,
        sha: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            source: source.into(),
            repository: repository.into(),
            git_ref: git_ref.into(),
            sha: sha.into(),
            timestamp: now.with_nanosecond(0).unwrap_or(now),
        }
    }
}
