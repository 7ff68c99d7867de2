//! # cdm-gate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cdm_cli::report::{run_report, ReportArgs};
use cdm_cli::validate::{run_business_rules, run_metadata, run_schema};
use cdm_cli::{load_paths, resolve_repo_root};
use cdm_report::ReportContext;

/// CDM gate: validates contact submissions in a pull request.
#[derive(Parser, Debug)]
#[command(name = "cdm-gate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository root. Discovered from the current directory when omitted.
    #[arg(long, global = true)]
    repo_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate contacts against the CDM contact schema.
    Schema,

    /// Apply business rules to contacts.
    BusinessRules,

    /// Validate submission metadata.
    Metadata,

    /// Aggregate validator logs into JSON and Markdown reports.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let repo_root = resolve_repo_root(cli.repo_root.as_deref());
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = load_paths(cli.config.as_deref(), &repo_root).and_then(|paths| {
        match cli.command {
            Commands::Schema => run_schema(&paths),
            Commands::BusinessRules => run_business_rules(&paths),
            Commands::Metadata => run_metadata(&paths),
            Commands::Report(args) => run_report(&args, &paths, &ReportContext::from_env()),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
