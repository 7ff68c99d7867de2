//! # Report Aggregation
//!
//! Builds a [`ValidationReport`] from the three validator logs and writes
//! it as JSON and Markdown.

use std::path::{Path, PathBuf};

use cdm_core::temporal::now_iso8601;
use cdm_core::{find_json_files, ResolvedPaths};
use cdm_rules::{BUSINESS_PROFILE, METADATA_PROFILE};
use cdm_schema::CDM_PROFILE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse::{read_log, ValidatorStatus};
use crate::render::render_markdown;

pub const JSON_REPORT_FILE: &str = "validation-report.json";
pub const MARKDOWN_REPORT_FILE: &str = "validation-report.md";

const UNKNOWN: &str = "unknown";

/// Errors writing the report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A report file could not be written.
    #[error("failed to write report {path}: {source}")]
    Write {
        /// Path of the report file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Pull request identifiers taken from the CI environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub pull_request: String,
    pub repository: String,
    pub branch: String,
    pub commit: String,
}

impl Default for ReportContext {
    fn default() -> Self {
        Self {
            pull_request: UNKNOWN.to_string(),
            repository: UNKNOWN.to_string(),
            branch: UNKNOWN.to_string(),
            commit: UNKNOWN.to_string(),
        }
    }
}

impl ReportContext {
    /// Read `PR_NUMBER`, `GITHUB_REPOSITORY`, `GITHUB_HEAD_REF` (falling back
    /// to `GITHUB_REF_NAME`) and `GITHUB_SHA`. Absent values become `unknown`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a context from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            pull_request: get("PR_NUMBER").unwrap_or_else(|| UNKNOWN.to_string()),
            repository: get("GITHUB_REPOSITORY").unwrap_or_else(|| UNKNOWN.to_string()),
            branch: get("GITHUB_HEAD_REF")
                .or_else(|| get("GITHUB_REF_NAME"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            commit: get("GITHUB_SHA").unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// One validator's outcome as read from its log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorResult {
    pub status: ValidatorStatus,
    /// Failure markers and violation lines, in log order.
    pub details: Vec<String>,
    /// The `Total files:` / `Valid files:` / `Invalid files:` lines.
    pub summary: String,
}

impl ValidatorResult {
    /// Result for a validator whose log is missing.
    pub fn unknown() -> Self {
        Self {
            status: ValidatorStatus::Unknown,
            details: Vec::new(),
            summary: String::new(),
        }
    }
}

/// Input file counts, taken directly from disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCount {
    pub total: usize,
    pub contacts: usize,
    pub metadata: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResults {
    pub cdm_compliance: ValidatorResult,
    pub business_rules: ValidatorResult,
    pub metadata: ValidatorResult,
    pub file_count: FileCount,
    pub overall_status: ValidatorStatus,
}

impl ValidationResults {
    /// Assemble results. The overall status is `passed` only if every
    /// validator passed; `unknown` counts as failure.
    pub fn new(
        cdm_compliance: ValidatorResult,
        business_rules: ValidatorResult,
        metadata: ValidatorResult,
        file_count: FileCount,
    ) -> Self {
        let all_passed = [&cdm_compliance, &business_rules, &metadata]
            .iter()
            .all(|r| r.status.is_passed());
        Self {
            cdm_compliance,
            business_rules,
            metadata,
            file_count,
            overall_status: if all_passed {
                ValidatorStatus::Passed
            } else {
                ValidatorStatus::Failed
            },
        }
    }

    /// Validators in report order with their display names.
    pub fn validators(&self) -> [(&'static str, &ValidatorResult); 3] {
        [
            ("CDM Compliance", &self.cdm_compliance),
            ("Business Rules", &self.business_rules),
            ("Metadata", &self.metadata),
        ]
    }
}

/// The aggregated pull request report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub timestamp: String,
    pub pull_request: String,
    pub repository: String,
    pub branch: String,
    pub commit: String,
    pub validation_results: ValidationResults,
}

impl ValidationReport {
    /// `true` iff the overall status is `passed`.
    pub fn passed(&self) -> bool {
        self.validation_results.overall_status.is_passed()
    }

    /// Process exit code: 0 if every validator passed, else 1.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Read the validator logs from `paths.log_dir`, count input files, and
/// assemble the report.
pub fn aggregate(paths: &ResolvedPaths, ctx: &ReportContext) -> ValidationReport {
    let cdm_compliance = read_log(&paths.log_dir.join(CDM_PROFILE.log_file));
    let business_rules = read_log(&paths.log_dir.join(BUSINESS_PROFILE.log_file));
    let metadata = read_log(&paths.log_dir.join(METADATA_PROFILE.log_file));

    let contacts = find_json_files(&paths.repo_root, &paths.contacts_dir).len();
    let metadata_files = find_json_files(&paths.repo_root, &paths.submissions_dir).len();
    let file_count = FileCount {
        total: contacts + metadata_files,
        contacts,
        metadata: metadata_files,
    };

    let validation_results =
        ValidationResults::new(cdm_compliance, business_rules, metadata, file_count);

    tracing::info!(
        cdm = %validation_results.cdm_compliance.status,
        business = %validation_results.business_rules.status,
        metadata = %validation_results.metadata.status,
        overall = %validation_results.overall_status,
        contacts,
        metadata_files,
        "aggregated validation results"
    );

    ValidationReport {
        timestamp: now_iso8601(),
        pull_request: ctx.pull_request.clone(),
        repository: ctx.repository.clone(),
        branch: ctx.branch.clone(),
        commit: ctx.commit.clone(),
        validation_results,
    }
}

/// Write `validation-report.json` and `validation-report.md` into `dir`.
///
/// # Errors
///
/// Returns [`ReportError`] if either file cannot be written.
pub fn write_reports(
    report: &ValidationReport,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.display().to_string(),
        source,
    })?;

    let json_path = dir.join(JSON_REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    write_file(&json_path, &json)?;

    let md_path = dir.join(MARKDOWN_REPORT_FILE);
    write_file(&md_path, &render_markdown(report))?;

    Ok((json_path, md_path))
}

fn write_file(path: &Path, body: &str) -> Result<(), ReportError> {
    std::fs::write(path, body).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })
}
