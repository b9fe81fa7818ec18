//! `devfeat list`: show discovered features.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use devfeat_manifest::{MANIFEST_FILE_NAME, discover_feature_dirs, load_manifest};

use crate::context::Context;
use crate::output::{OutputFormat, print_json};
use crate::theme::Theme;

/// Arguments for `devfeat list`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ListArgs {
    /// Features root directory (defaults to `features.src_dir`)
    #[arg(long)]
    pub(crate) src: Option<PathBuf>,
}

#[derive(Serialize)]
struct ListedFeature {
    dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// List every feature directory and its manifest identity.
///
/// Returns `false` if any manifest could not be read.
pub(crate) fn run_list(ctx: &Context, args: &ListArgs) -> Result<bool> {
    let root = ctx.src_dir(args.src.as_deref());
    let dirs = discover_feature_dirs(&root)
        .with_context(|| format!("failed to read features root {}", root.display()))?;

    let listed: Vec<ListedFeature> = dirs
        .iter()
        .map(|dir| {
            let display = dir.display().to_string();
            match load_manifest(dir.join(MANIFEST_FILE_NAME)) {
                Ok(manifest) => ListedFeature {
                    dir: display,
                    id: Some(manifest.id),
                    version: Some(manifest.version),
                    name: Some(manifest.name),
                    error: None,
                },
                Err(e) => ListedFeature {
                    dir: display,
                    id: None,
                    version: None,
                    name: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();
    let all_ok = listed.iter().all(|f| f.error.is_none());

    match ctx.format {
        OutputFormat::Json => print_json(&listed)?,
        OutputFormat::Pretty => {
            eprintln!("{}", Theme::header(&format!("Features in {}", root.display())));
            if listed.is_empty() {
                eprintln!("{}", Theme::info("no feature directories found"));
            }
            for feature in &listed {
                match (&feature.id, &feature.error) {
                    (Some(id), _) => eprintln!(
                        "  {id} {} {}",
                        Theme::dimmed(feature.version.as_deref().unwrap_or_default()),
                        feature.name.as_deref().unwrap_or_default()
                    ),
                    (None, Some(error)) => {
                        eprintln!("  {}", Theme::error(&format!("{}: {error}", feature.dir)));
                    },
                    (None, None) => {},
                }
            }
        },
    }

    Ok(all_ok)
}
