//! Feature manifest types.
//!
//! A feature manifest (`devcontainer-feature.json`) declares a feature's
//! identity, its user-configurable options and the environment it contributes
//! to the container. Fields the model does not know about are carried through
//! untouched so that derived documents stay a faithful copy of the source.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ManifestError, ManifestResult};

/// `MAJOR.MINOR.PATCH` followed by anything (pre-release, build, ...).
static SEMVER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").expect("static pattern"));

/// A feature manifest loaded from `devcontainer-feature.json`.
///
/// Immutable once loaded: nothing in the pipeline writes a manifest back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureManifest {
    /// Feature identifier. Must equal the containing directory's name.
    #[serde(default)]
    pub id: String,
    /// Version string, expected to look like `MAJOR.MINOR.PATCH`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Human-readable display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-configurable options keyed by option name (case-sensitive).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionSpec>,
    /// Features that must be installed for this one to work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<FeatureRefs>,
    /// Features that should be installed before this one when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installs_after: Option<FeatureRefs>,
    /// Environment variables set in the container, passed through verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub container_env: BTreeMap<String, String>,
    /// Every other manifest field, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl FeatureManifest {
    /// Parse a manifest from JSON text.
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for invalid JSON or mistyped fields,
    /// and [`ManifestError::NotAnObject`] when the document is not an object.
    pub fn from_json_str(content: &str, origin: &std::path::Path) -> ManifestResult<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| ManifestError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        if !value.is_object() {
            return Err(ManifestError::NotAnObject {
                path: origin.to_path_buf(),
            });
        }

        serde_json::from_value(value).map_err(|e| ManifestError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Whether `version` starts with a `MAJOR.MINOR.PATCH` triple.
    #[must_use]
    pub fn has_semver_version(&self) -> bool {
        SEMVER_PREFIX.is_match(&self.version)
    }

    /// Environment variable name the install engine uses for option `key`.
    #[must_use]
    pub fn option_env_name(key: &str) -> String {
        option_env_name(key)
    }
}

/// Upper-case `key` and replace anything that is not `[A-Z0-9_]` with `_`.
#[must_use]
pub fn option_env_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// One user-configurable option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Declared value kind (`"type"` on the wire).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OptionKind>,
    /// Optional description shown to users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Closed set of allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Suggested values (open set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<Vec<String>>,
    /// Every other option field, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Value kind of an option.
///
/// Unknown kinds are kept rather than rejected; validation only warns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OptionKind {
    /// Free-form or enumerated string.
    String,
    /// `true` / `false`.
    Boolean,
    /// Any other declared kind, verbatim.
    Other(String),
}

impl OptionKind {
    /// Whether this kind is one the pipeline understands.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for OptionKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<OptionKind> for String {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::String => "string".to_owned(),
            OptionKind::Boolean => "boolean".to_owned(),
            OptionKind::Other(other) => other,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// References to other features, kept in the shape they were declared in.
///
/// `dependsOn` is usually an object mapping each reference to the options it
/// is installed with; `installsAfter` is a list. Either form serializes back
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureRefs {
    /// `["ghcr.io/org/feature:1", ...]`
    List(Vec<String>),
    /// `{"ghcr.io/org/feature:1": {"option": "value"}, ...}`
    Map(serde_json::Map<String, Value>),
}

impl FeatureRefs {
    /// The referenced feature ids. Object keys come back sorted.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::List(list) => list.iter().map(String::as_str).collect(),
            Self::Map(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Options a reference is installed with. Always `None` for the list form.
    #[must_use]
    pub fn options_for(&self, reference: &str) -> Option<&Value> {
        match self {
            Self::List(_) => None,
            Self::Map(map) => map.get(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(json: &str) -> ManifestResult<FeatureManifest> {
        FeatureManifest::from_json_str(json, Path::new("devcontainer-feature.json"))
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = parse(r#"{"id": "hello", "version": "1.0.0", "name": "Hello"}"#).unwrap();
        assert_eq!(manifest.id, "hello");
        assert_eq!(manifest.version, "1.0.0");
        assert!(manifest.description.is_none());
        assert!(manifest.options.is_empty());
        assert!(manifest.extra.is_empty());
    }

    #[test]
    fn test_options_parse() {
        let manifest = parse(
            r#"{
                "id": "hello",
                "version": "1.0.0",
                "name": "Hello",
                "options": {
                    "greeting": {
                        "type": "string",
                        "description": "Greeting to print",
                        "default": "hey",
                        "proposals": ["hey", "hello"]
                    },
                    "loud": { "type": "boolean", "default": false },
                    "size": { "type": "number" }
                }
            }"#,
        )
        .unwrap();

        let greeting = &manifest.options["greeting"];
        assert_eq!(greeting.kind, Some(OptionKind::String));
        assert_eq!(greeting.default, Some(Value::from("hey")));
        assert_eq!(
            greeting.proposals.as_deref(),
            Some(&["hey".to_owned(), "hello".to_owned()][..])
        );
        assert_eq!(manifest.options["loud"].kind, Some(OptionKind::Boolean));
        assert_eq!(
            manifest.options["size"].kind,
            Some(OptionKind::Other("number".into()))
        );
        assert!(!manifest.options["size"].kind.as_ref().unwrap().is_known());
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let manifest = parse(
            r#"{"id": "hello", "version": "1.0.0", "name": "Hello",
                "documentationURL": "https://example.com", "licenseURL": "x"}"#,
        )
        .unwrap();
        assert_eq!(manifest.extra.len(), 2);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["documentationURL"], "https://example.com");
        assert_eq!(json["id"], "hello");
    }

    #[test]
    fn test_feature_refs_accept_list_and_object() {
        let manifest = parse(
            r#"{"id": "a", "version": "1.0.0", "name": "A",
                "installsAfter": ["ghcr.io/x/common-utils"],
                "dependsOn": {"ghcr.io/x/node:1": {"version": "lts"}}}"#,
        )
        .unwrap();
        let installs_after = manifest.installs_after.as_ref().unwrap();
        assert_eq!(installs_after.references(), vec!["ghcr.io/x/common-utils"]);
        assert_eq!(installs_after.options_for("ghcr.io/x/common-utils"), None);

        let depends_on = manifest.depends_on.as_ref().unwrap();
        assert_eq!(depends_on.references(), vec!["ghcr.io/x/node:1"]);
        assert_eq!(
            depends_on.options_for("ghcr.io/x/node:1"),
            Some(&serde_json::json!({"version": "lts"}))
        );
    }

    #[test]
    fn test_feature_refs_keep_their_shape() {
        let source = serde_json::json!({
            "id": "a", "version": "1.0.0", "name": "A",
            "installsAfter": ["ghcr.io/x/common-utils"],
            "dependsOn": {"ghcr.io/x/node:1": {"version": "lts"}, "ghcr.io/x/go:1": {}}
        });
        let manifest = parse(&source.to_string()).unwrap();

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["dependsOn"], source["dependsOn"]);
        assert_eq!(json["installsAfter"], source["installsAfter"]);
    }

    #[test]
    fn test_malformed_json() {
        let err = parse(r#"{"id": "hello", "#).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn test_not_an_object() {
        let err = parse(r#"["hello"]"#).unwrap_err();
        assert!(matches!(err, ManifestError::NotAnObject { .. }));
    }

    #[test]
    fn test_semver_detection() {
        let mut manifest = FeatureManifest::default();
        for (version, expected) in [
            ("1.0.0", true),
            ("10.20.30-beta.1", true),
            ("2", false),
            ("1.0", false),
            ("v1.0.0", false),
            ("", false),
        ] {
            manifest.version = version.to_owned();
            assert_eq!(manifest.has_semver_version(), expected, "version {version:?}");
        }
    }

    #[test]
    fn test_option_env_name() {
        assert_eq!(option_env_name("greeting"), "GREETING");
        assert_eq!(option_env_name("installZsh"), "INSTALLZSH");
        assert_eq!(option_env_name("node-version"), "NODE_VERSION");
    }

    #[test]
    fn test_option_kind_serializes_lowercase() {
        let spec = OptionSpec {
            kind: Some(OptionKind::Boolean),
            ..OptionSpec::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"type":"boolean"}"#);
    }
}
