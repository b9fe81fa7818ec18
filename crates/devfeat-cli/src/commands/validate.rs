//! `devfeat validate`: check feature directories.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use devfeat_validate::{ValidateOptions, ValidationReport, ValidationSummary, Validator};

use crate::context::{Context, FeatureTarget};
use crate::output::{OutputFormat, print_json};
use crate::theme::Theme;

/// Arguments for `devfeat validate`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ValidateArgs {
    /// Feature names (looked up under the features root) or directories
    pub(crate) features: Vec<String>,

    /// Validate every feature under the features root
    #[arg(long, conflicts_with = "features")]
    pub(crate) all: bool,

    /// Features root directory (defaults to `features.src_dir`)
    #[arg(long)]
    pub(crate) src: Option<PathBuf>,

    /// Root holding one test directory per feature
    #[arg(long)]
    pub(crate) tests: Option<PathBuf>,
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    reports: &'a [ValidationReport],
    summary: ValidationSummary,
}

/// Validate the selected features. Returns whether all of them are valid.
pub(crate) fn run_validate(ctx: &Context, args: &ValidateArgs) -> Result<bool> {
    let targets = ctx.features(&args.features, args.all, args.src.as_deref())?;
    let reports = validate_targets(ctx, &targets, args.tests.as_deref());
    let summary = ValidationSummary::fold(&reports);

    match ctx.format {
        OutputFormat::Json => print_json(&ValidateOutput {
            reports: &reports,
            summary,
        })?,
        OutputFormat::Pretty => {
            for report in &reports {
                print_report(report);
            }
            print_summary(&summary);
        },
    }

    Ok(summary.is_success())
}

/// Validate each target with one shared validator.
pub(crate) fn validate_targets(
    ctx: &Context,
    targets: &[FeatureTarget],
    tests_flag: Option<&Path>,
) -> Vec<ValidationReport> {
    let mut options = ValidateOptions::default();
    if let Some(root) = ctx.tests_root(tests_flag) {
        debug!(root = %root.display(), "Using tests root");
        options = options.with_tests_root(root);
    }
    let validator = Validator::new().with_options(options);

    targets
        .iter()
        .map(|target| validator.validate(&target.dir, &target.name))
        .collect()
}

/// Print one report to stderr.
pub(crate) fn print_report(report: &ValidationReport) {
    if report.is_valid() {
        eprintln!("{}", Theme::success(&report.feature));
    } else {
        eprintln!("{}", Theme::error(&report.feature));
    }
    for finding in &report.errors {
        eprintln!("    {} {}", Theme::error("error:"), finding.message);
    }
    for finding in &report.warnings {
        eprintln!("    {} {}", Theme::warning("warning:"), finding.message);
    }
}

fn print_summary(summary: &ValidationSummary) {
    eprintln!("{}", Theme::separator());
    eprintln!(
        "{} {} feature(s), {} failed: {}",
        Theme::header("Validated"),
        summary.features,
        summary.failed,
        Theme::counts(summary.errors, summary.warnings)
    );
}
