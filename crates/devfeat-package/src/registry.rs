//! Registry reference composition.
//!
//! Only describes where a feature would be published. Nothing here talks to
//! a registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Registry used when none is configured.
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

/// Where a feature would be published: `<registry>/<namespace>/<id>:<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRef {
    /// Registry host, e.g. `ghcr.io`.
    pub registry: String,
    /// Namespace within the registry, e.g. `owner/features`.
    pub namespace: String,
    /// Feature id.
    pub id: String,
    /// Feature version.
    pub version: String,
}

impl RegistryRef {
    /// Compose a reference. Surrounding slashes on `registry` and
    /// `namespace` are dropped.
    pub fn new(
        registry: impl AsRef<str>,
        namespace: impl AsRef<str>,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.as_ref().trim_matches('/').to_owned(),
            namespace: namespace.as_ref().trim_matches('/').to_owned(),
            id: id.into(),
            version: version.into(),
        }
    }

    /// The repository part without a tag.
    #[must_use]
    pub fn repository(&self) -> String {
        if self.namespace.is_empty() {
            format!("{}/{}", self.registry, self.id)
        } else {
            format!("{}/{}/{}", self.registry, self.namespace, self.id)
        }
    }

    /// The full reference including the version tag.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository(), self.version)
    }

    /// Tags a publish would apply: `MAJOR`, `MAJOR.MINOR`, the full version
    /// and `latest`. Versions not in `MAJOR.MINOR.PATCH` form get only the
    /// full version and `latest`.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let core = self
            .version
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let parts: Vec<&str> = core.split('.').collect();
        let numeric = parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));

        let mut tags = Vec::new();
        if numeric && core == self.version {
            tags.push(parts[0].to_owned());
            tags.push(format!("{}.{}", parts[0], parts[1]));
        }
        tags.push(self.version.clone());
        tags.push("latest".to_owned());
        tags
    }
}

impl fmt::Display for RegistryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}
