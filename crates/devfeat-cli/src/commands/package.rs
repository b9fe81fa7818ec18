//! `devfeat package`: build archives and metadata.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use devfeat_package::{
    BuildSummary, PackageJob, PackageOptions, PackageOutcome, Packager, write_summary,
};
use devfeat_validate::ValidationReport;

use crate::commands::validate::{print_report, validate_targets};
use crate::context::Context;
use crate::output::{OutputFormat, print_json};
use crate::theme::Theme;

/// Arguments for `devfeat package`.
#[derive(Debug, Clone, clap::Args)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct PackageArgs {
    /// Feature names (looked up under the features root) or directories
    pub(crate) features: Vec<String>,

    /// Package every feature under the features root
    #[arg(long, conflicts_with = "features")]
    pub(crate) all: bool,

    /// Features root directory (defaults to `features.src_dir`)
    #[arg(long)]
    pub(crate) src: Option<PathBuf>,

    /// Root holding one test directory per feature
    #[arg(long)]
    pub(crate) tests: Option<PathBuf>,

    /// Output directory (defaults to `build.output_dir`)
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Show what would be produced without writing anything
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Record publish intent in the build summary
    #[arg(long)]
    pub(crate) push: bool,

    /// Registry host for the publish reference
    #[arg(long)]
    pub(crate) registry: Option<String>,

    /// Registry namespace for the publish reference
    #[arg(long)]
    pub(crate) namespace: Option<String>,

    /// Package even if validation reports errors
    #[arg(long)]
    pub(crate) skip_validation: bool,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum PackageView {
    Built {
        feature: String,
        archive: String,
        metadata: String,
        entries: Vec<String>,
        warnings: Vec<String>,
        reference: String,
        tags: Vec<String>,
    },
    Planned {
        feature: String,
        version: String,
        archive: String,
        metadata: String,
        entries: Vec<String>,
        reference: String,
    },
    Failed {
        feature: String,
        error: String,
    },
}

#[derive(Serialize)]
struct PackageOutput<'a> {
    packages: Vec<PackageView>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    refused: &'a [&'a ValidationReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

/// Package the selected features. Returns whether every feature was packaged.
pub(crate) async fn run_package(ctx: &Context, args: &PackageArgs) -> Result<bool> {
    let targets = ctx.features(&args.features, args.all, args.src.as_deref())?;

    if !args.skip_validation {
        let reports = validate_targets(ctx, &targets, args.tests.as_deref());
        let invalid: Vec<&ValidationReport> = reports.iter().filter(|r| !r.is_valid()).collect();
        if !invalid.is_empty() {
            match ctx.format {
                OutputFormat::Json => print_json(&PackageOutput {
                    packages: Vec::new(),
                    refused: &invalid,
                    summary: None,
                })?,
                OutputFormat::Pretty => {
                    for report in &invalid {
                        print_report(report);
                    }
                    eprintln!(
                        "{}",
                        Theme::error(&format!(
                            "refusing to package: {} feature(s) failed validation (use --skip-validation to override)",
                            invalid.len()
                        ))
                    );
                },
            }
            return Ok(false);
        }
    }

    let options = PackageOptions {
        dry_run: args.dry_run,
        push: args.push,
        registry: args
            .registry
            .clone()
            .unwrap_or_else(|| ctx.config.registry.registry.clone()),
        namespace: args
            .namespace
            .clone()
            .unwrap_or_else(|| ctx.config.registry.namespace.clone()),
    };
    let output_dir = ctx.output_dir(args.output.as_deref());

    let jobs = targets
        .iter()
        .map(|t| PackageJob {
            feature_dir: t.dir.clone(),
            feature_name: t.name.clone(),
        })
        .collect();
    let results = Packager::new()
        .package_many(jobs, &output_dir, &options)
        .await;

    let mut all_ok = true;
    let mut summaries = Vec::new();
    let mut views = Vec::new();
    for (target, result) in targets.iter().zip(results) {
        let view = match result {
            Ok(PackageOutcome::Built(built)) => {
                summaries.push(BuildSummary::from_built(
                    &built,
                    &ctx.workspace,
                    &output_dir,
                    &options,
                ));
                PackageView::Built {
                    feature: built.metadata.manifest.id.clone(),
                    archive: built.archive_path.display().to_string(),
                    metadata: built.metadata_path.display().to_string(),
                    entries: built.entries,
                    warnings: built.warnings,
                    reference: built.registry.reference(),
                    tags: built.registry.tags(),
                }
            },
            Ok(PackageOutcome::Planned(plan)) => PackageView::Planned {
                feature: plan.feature,
                version: plan.version,
                archive: plan.archive_path.display().to_string(),
                metadata: plan.metadata_path.display().to_string(),
                entries: plan.entries,
                reference: plan.registry.reference(),
            },
            Err(e) => {
                all_ok = false;
                PackageView::Failed {
                    feature: target.name.clone(),
                    error: e.to_string(),
                }
            },
        };
        views.push(view);
    }

    let summary_path = if summaries.is_empty() {
        None
    } else {
        let path = write_summary(&summaries, &output_dir).context("failed to write build summary")?;
        Some(path.display().to_string())
    };

    match ctx.format {
        OutputFormat::Json => print_json(&PackageOutput {
            packages: views,
            refused: &[],
            summary: summary_path,
        })?,
        OutputFormat::Pretty => {
            for view in &views {
                print_view(view, args.push);
            }
            if let Some(path) = &summary_path {
                eprintln!("{}", Theme::dimmed(&format!("summary: {path}")));
            }
        },
    }

    Ok(all_ok)
}

fn print_view(view: &PackageView, push: bool) {
    match view {
        PackageView::Built {
            feature,
            archive,
            warnings,
            reference,
            ..
        } => {
            eprintln!("{} {feature} -> {archive}", Theme::success("packaged"));
            for warning in warnings {
                eprintln!("    {} {warning}", Theme::warning("warning:"));
            }
            if push {
                eprintln!(
                    "    {}",
                    Theme::info(&format!("publish requested for {reference}; run your publish step to push"))
                );
            }
        },
        PackageView::Planned {
            feature,
            archive,
            metadata,
            entries,
            reference,
            ..
        } => {
            eprintln!("{} {feature}", Theme::header("dry run:"));
            eprintln!("    archive:   {archive}");
            eprintln!("    metadata:  {metadata}");
            eprintln!("    reference: {reference}");
            for entry in entries {
                eprintln!("    {}", Theme::dimmed(entry));
            }
        },
        PackageView::Failed { feature, error } => {
            eprintln!("{} {error}", Theme::error(feature));
        },
    }
}
