//! # Validator Log Parsing
//!
//! The only interface between a validator and the aggregator is the log
//! file. Status comes from the log's final line, which must carry one of
//! the fixed phrases in [`cdm_core::batch`]; details and summary lines are
//! lifted out verbatim.

use std::path::Path;

use cdm_core::batch::{FAILURE_MARKER, FAILURE_PHRASE, SUCCESS_MARKER, SUCCESS_PHRASE};
use serde::{Deserialize, Serialize};

use crate::report::ValidatorResult;

const SUMMARY_PREFIXES: [&str; 3] = ["Total files:", "Valid files:", "Invalid files:"];

/// Outcome of one validator as read from its log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorStatus {
    Passed,
    Failed,
    /// The log is missing or carries neither phrase: the validator did not run.
    Unknown,
}

impl ValidatorStatus {
    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a log body by its last non-blank line.
///
/// Phrases anywhere else in the log are ignored: detail lines quote record
/// content and cannot vouch for the outcome.
pub fn classify(content: &str) -> ValidatorStatus {
    let Some(verdict) = content.lines().map(str::trim).rfind(|l| !l.is_empty()) else {
        return ValidatorStatus::Unknown;
    };
    if verdict.strip_prefix(SUCCESS_MARKER).map(str::trim_start) == Some(SUCCESS_PHRASE) {
        ValidatorStatus::Passed
    } else if verdict.starts_with(FAILURE_MARKER) && verdict.ends_with(FAILURE_PHRASE) {
        ValidatorStatus::Failed
    } else {
        ValidatorStatus::Unknown
    }
}

/// Parse a log body into status, detail lines and summary.
pub fn parse_log(content: &str) -> ValidatorResult {
    let mut details = Vec::new();
    let mut summary = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if SUMMARY_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            summary.push(trimmed.to_string());
        } else if trimmed.contains(FAILURE_MARKER) || trimmed.to_lowercase().contains("violation")
        {
            details.push(trimmed.to_string());
        }
    }

    ValidatorResult {
        status: classify(content),
        details,
        summary: summary.join("\n"),
    }
}

/// Read and parse the log at `path`. A missing or unreadable log yields an
/// [`ValidatorStatus::Unknown`] result.
pub fn read_log(path: &Path) -> ValidatorResult {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_log(&content),
        Err(e) => {
            tracing::warn!(log = %path.display(), error = %e, "validator log unavailable");
            ValidatorResult::unknown()
        }
    }
}
