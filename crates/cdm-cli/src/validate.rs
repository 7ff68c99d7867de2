//! # Validator Subcommands
//!
//! `schema`, `business-rules` and `metadata`. Each runs one validator over
//! its directory, writes the log, echoes it to stdout, and returns the
//! exit code.

use anyhow::{Context, Result};
use cdm_core::{BatchReport, BatchRunner, ResolvedPaths};
use cdm_rules::{BusinessRulesValidator, MetadataValidator};
use cdm_schema::ContactSchemaValidator;

/// Execute `cdm-gate schema`.
///
/// Returns exit code: 0 if every contact is CDM compliant, 1 otherwise.
pub fn run_schema(paths: &ResolvedPaths) -> Result<u8> {
    let mut validator =
        ContactSchemaValidator::new().context("failed to compile contact schema")?;
    let report = BatchRunner::new(&paths.repo_root).run_dir(&mut validator, &paths.contacts_dir);
    finish(&report, paths)
}

/// Execute `cdm-gate business-rules`.
///
/// The duplicate-email registry lives only for this call.
pub fn run_business_rules(paths: &ResolvedPaths) -> Result<u8> {
    let mut validator = BusinessRulesValidator::new();
    let report = BatchRunner::new(&paths.repo_root).run_dir(&mut validator, &paths.contacts_dir);
    tracing::debug!(
        distinct_emails = validator.registry().len(),
        "business rules registry released"
    );
    finish(&report, paths)
}

/// Execute `cdm-gate metadata`.
pub fn run_metadata(paths: &ResolvedPaths) -> Result<u8> {
    let mut validator = MetadataValidator::new(&paths.contacts_dir);
    let report =
        BatchRunner::new(&paths.repo_root).run_dir(&mut validator, &paths.submissions_dir);
    finish(&report, paths)
}

fn finish(report: &BatchReport, paths: &ResolvedPaths) -> Result<u8> {
    let log_path = report
        .write_log(&paths.log_dir, &paths.repo_root)
        .context("failed to write validation log")?;
    tracing::info!(log = %log_path.display(), "wrote validation log");

    print!("{}", report.render_log(&paths.repo_root));
    Ok(report.exit_code())
}
