//! Environment variable fallbacks.
//!
//! A `DEVFEAT_*` variable only fills a field that no config file set; files
//! always win over the environment.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Environment variable to dotted config field.
pub const ENV_FALLBACKS: [(&str, &str); 4] = [
    ("DEVFEAT_OUTPUT_DIR", "build.output_dir"),
    ("DEVFEAT_REGISTRY", "registry.registry"),
    ("DEVFEAT_NAMESPACE", "registry.namespace"),
    ("DEVFEAT_LOG_LEVEL", "logging.level"),
];

/// Snapshot the `DEVFEAT_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("DEVFEAT_"))
        .collect()
}

/// Apply fallbacks for fields still at their default. Returns how many were
/// applied.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;
    for (var, field) in ENV_FALLBACKS {
        let Some(value) = env_vars.get(var) else {
            continue;
        };
        let set_by_file = sources
            .get(field)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            debug!(var, field, "config file value takes precedence over environment");
            continue;
        }
        if set_field(merged, field, value) {
            sources.insert(field.to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        }
    }
    applied
}

fn set_field(root: &mut toml::Value, field: &str, value: &str) -> bool {
    let Some((section, key)) = field.split_once('.') else {
        return false;
    };
    let Some(table) = root.as_table_mut() else {
        return false;
    };
    let section = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    match section.as_table_mut() {
        Some(section) => {
            section.insert(key.to_owned(), toml::Value::String(value.to_owned()));
            true
        },
        None => false,
    }
}
