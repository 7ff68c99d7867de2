//! # Report Subcommand
//!
//! Aggregates the three validator logs into `validation-report.json` and
//! `validation-report.md`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cdm_core::ResolvedPaths;
use cdm_report::{aggregate, write_reports, ReportContext};
use clap::Args;

/// Arguments for the `cdm-gate report` subcommand.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Directory for the generated reports. Defaults to the log directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Execute the report subcommand.
///
/// Returns exit code: 0 if all three validators passed, 1 otherwise.
pub fn run_report(args: &ReportArgs, paths: &ResolvedPaths, ctx: &ReportContext) -> Result<u8> {
    let report = aggregate(paths, ctx);

    let out_dir = args
        .output_dir
        .as_deref()
        .map(|p| crate::resolve_path(p, &paths.repo_root))
        .unwrap_or_else(|| paths.log_dir.clone());

    let (json_path, md_path) =
        write_reports(&report, &out_dir).context("failed to write validation report")?;

    let results = &report.validation_results;
    for (name, result) in results.validators() {
        println!("{name}: {}", result.status);
    }
    println!("Overall: {}", results.overall_status);
    println!("Reports: {}, {}", json_path.display(), md_path.display());

    Ok(report.exit_code())
}
