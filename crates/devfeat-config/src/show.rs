//! Resolved configuration and its rendering.

use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};
use crate::types::Config;

/// A loaded configuration with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Which layer set each field.
    pub field_sources: FieldSources,
    /// Files that contributed, lowest precedence first.
    pub loaded_files: Vec<String>,
}

/// Output format for [`ResolvedConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML annotated with each field's source layer.
    Toml,
    /// JSON including `field_sources` and `loaded_files`.
    Json,
}

impl ResolvedConfig {
    /// Layer that set `field` (dotted path), if known.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<ConfigLayer> {
        self.field_sources.get(field).copied()
    }

    /// Render the configuration for display.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RenderError`] if serialization fails.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::RenderError(e.to_string())),
            ShowFormat::Toml => {
                let body = toml::to_string_pretty(&self.config)
                    .map_err(|e| ConfigError::RenderError(e.to_string()))?;
                let mut out = String::new();
                for file in &self.loaded_files {
                    out.push_str(&format!("# loaded: {file}\n"));
                }
                let mut section = String::new();
                for line in body.lines() {
                    let trimmed = line.trim();
                    if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                        name.clone_into(&mut section);
                        out.push_str(line);
                    } else if let Some((key, _)) = trimmed.split_once(" = ") {
                        out.push_str(line);
                        if let Some(layer) = self.source_of(&format!("{section}.{key}")) {
                            out.push_str(&format!("  # {layer}"));
                        }
                    } else {
                        out.push_str(line);
                    }
                    out.push('\n');
                }
                Ok(out)
            },
        }
    }
}
