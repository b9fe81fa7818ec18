//! `devfeat config`: print the resolved configuration.

use anyhow::{Context as _, Result};
use devfeat_config::{ResolvedConfig, ShowFormat};

use crate::output::OutputFormat;

/// Print `resolved` to stdout, annotated with each field's source layer.
pub(crate) fn run_config(resolved: &ResolvedConfig, format: OutputFormat) -> Result<bool> {
    let show = match format {
        OutputFormat::Pretty => ShowFormat::Toml,
        OutputFormat::Json => ShowFormat::Json,
    };
    let text = resolved
        .render(show)
        .context("failed to render configuration")?;
    println!("{}", text.trim_end());
    Ok(true)
}
