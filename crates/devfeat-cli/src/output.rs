//! Output format selection.
//!
//! Human-readable output and diagnostics go to stderr. `--format json`
//! writes one JSON document per command to stdout.

use anyhow::{Context, Result};
use serde::Serialize;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Colored text on stderr.
    #[default]
    Pretty,
    /// A JSON document on stdout.
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{text}");
    Ok(())
}
