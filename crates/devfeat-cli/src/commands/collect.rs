//! `devfeat collect`: write the collection document.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use devfeat_collection::{CollectionDocument, SourceInformation, aggregate_root, write_collection};

use crate::context::Context;
use crate::output::{OutputFormat, print_json};
use crate::theme::Theme;

/// Arguments for `devfeat collect`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CollectArgs {
    /// Features root directory (defaults to `features.src_dir`)
    #[arg(long)]
    pub(crate) src: Option<PathBuf>,

    /// Collection file to write (defaults to `<build.output_dir>/<collection.file_name>`)
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Source label recorded in `sourceInformation`
    #[arg(long)]
    pub(crate) source: Option<String>,

    /// Repository recorded in `sourceInformation`
    #[arg(long)]
    pub(crate) repository: Option<String>,

    /// Git ref recorded in `sourceInformation`
    #[arg(long = "ref")]
    pub(crate) git_ref: Option<String>,

    /// Commit SHA recorded in `sourceInformation`
    #[arg(long)]
    pub(crate) sha: Option<String>,
}

#[derive(Serialize)]
struct CollectOutput<'a> {
    path: String,
    duplicates: Vec<&'a str>,
    collection: &'a CollectionDocument,
}

/// Aggregate every feature manifest and write the collection file.
pub(crate) fn run_collect(ctx: &Context, args: &CollectArgs) -> Result<bool> {
    let section = &ctx.config.collection;
    let pick = |flag: &Option<String>, configured: &str| {
        flag.clone().unwrap_or_else(|| configured.to_owned())
    };
    let source_information = SourceInformation::new(
        pick(&args.source, &section.source),
        pick(&args.repository, &section.repository),
        pick(&args.git_ref, &section.git_ref),
        pick(&args.sha, &section.sha),
    );

    let root = ctx.src_dir(args.src.as_deref());
    let doc = aggregate_root(&root, source_information)
        .with_context(|| format!("failed to collect features under {}", root.display()))?;

    let path = match &args.output {
        Some(path) => ctx.resolve(path),
        None => ctx.output_dir(None).join(&section.file_name),
    };
    write_collection(&doc, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let duplicates = doc.duplicate_ids();
    match ctx.format {
        OutputFormat::Json => print_json(&CollectOutput {
            path: path.display().to_string(),
            duplicates,
            collection: &doc,
        })?,
        OutputFormat::Pretty => {
            for feature in &doc.features {
                eprintln!("  {} {}", feature.id, Theme::dimmed(&feature.version));
            }
            for id in &duplicates {
                eprintln!("{}", Theme::warning(&format!("duplicate feature id '{id}'")));
            }
            eprintln!(
                "{}",
                Theme::success(&format!(
                    "wrote {} feature(s) to {}",
                    doc.features.len(),
                    path.display()
                ))
            );
        },
    }

    Ok(true)
}
