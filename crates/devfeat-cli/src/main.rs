//! devfeat - dev container feature pipeline
//!
//! Validates feature directories, packages them into deterministic archives
//! with build metadata, and aggregates them into a collection document.
//! Exits 0 when the command fully succeeds and 1 otherwise.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod context;
mod output;
mod theme;

use commands::collect::{CollectArgs, run_collect};
use commands::config::run_config;
use commands::list::{ListArgs, run_list};
use commands::package::{PackageArgs, run_package};
use commands::validate::{ValidateArgs, run_validate};
use context::Context;
use output::OutputFormat;
use theme::Theme;

/// devfeat - validate, package and collect dev container features
#[derive(Parser)]
#[command(name = "devfeat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Workspace root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check feature directories for errors and warnings
    Validate(ValidateArgs),

    /// Build feature archives and metadata
    Package(PackageArgs),

    /// Write the collection document for every feature
    Collect(CollectArgs),

    /// List discovered features
    List(ListArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let resolved = devfeat_config::loader::load(Some(&workspace), None);

    // Set up logging from config, with --verbose override.
    let mut log_config = match &resolved {
        Ok(r) => {
            let mut lc = devfeat_telemetry::LogConfig::from_section(&r.config.logging)?;
            if cli.verbose {
                "debug".clone_into(&mut lc.level);
            }
            if let devfeat_telemetry::LogTarget::File(dir) = &mut lc.target {
                if dir.is_relative() {
                    *dir = workspace.join(&*dir);
                }
            }
            lc
        },
        Err(_) => {
            // Fallback if config loading fails.
            let level = if cli.verbose { "debug" } else { "warn" };
            devfeat_telemetry::LogConfig::new(level)
        },
    };
    if !std::io::stderr().is_terminal() {
        log_config = log_config.without_ansi();
    }
    if let Err(e) = devfeat_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let resolved = resolved.context("failed to load configuration")?;
    debug!(
        workspace = %workspace.display(),
        files = resolved.loaded_files.len(),
        "Loaded configuration"
    );

    let ctx = Context {
        workspace,
        config: resolved.config.clone(),
        format: cli.format,
    };

    match cli.command {
        Commands::Validate(args) => run_validate(&ctx, &args),
        Commands::Package(args) => run_package(&ctx, &args).await,
        Commands::Collect(args) => run_collect(&ctx, &args),
        Commands::List(args) => run_list(&ctx, &args),
        Commands::Config => run_config(&resolved, ctx.format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_all() {
        let cli = Cli::try_parse_from(["devfeat", "validate", "--all"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Validate(args) => {
                assert!(args.all);
                assert!(args.features.is_empty());
            },
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_all_conflicts_with_names() {
        assert!(Cli::try_parse_from(["devfeat", "validate", "--all", "node"]).is_err());
    }

    #[test]
    fn test_parse_package_flags() {
        let cli = Cli::try_parse_from([
            "devfeat",
            "package",
            "node",
            "--dry-run",
            "--push",
            "--namespace",
            "acme/features",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Package(args) => {
                assert_eq!(args.features, vec!["node"]);
                assert!(args.dry_run);
                assert!(args.push);
                assert_eq!(args.namespace.as_deref(), Some("acme/features"));
                assert_eq!(args.registry, None);
            },
            _ => panic!("expected package"),
        }
    }

    #[test]
    fn test_parse_collect_ref() {
        let cli = Cli::try_parse_from(["devfeat", "-C", "/tmp/ws", "collect", "--ref", "main"])
            .unwrap();
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/ws")));
        match cli.command {
            Commands::Collect(args) => assert_eq!(args.git_ref.as_deref(), Some("main")),
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["devfeat", "--format", "xml", "list"]).is_err());
    }
}
