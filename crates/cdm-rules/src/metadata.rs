//! # Submission Metadata Validation
//!
//! Audit-trail checks on the metadata record that accompanies each contact
//! submission. Every check is independent: a missing commit message does
//! not stop the branch name from being checked, and a mistyped
//! `schemaVersion` does not stop the submission id from being checked.
//!
//! ## Referential integrity
//!
//! When a submission id is present, the contact named by the metadata must
//! exist as `<contactId>.json` in the contact directory. Records without a
//! `contactId` fall back to `<submissionId>.json`.
//!
//! ## Freshness
//!
//! `processedAt` may not be in the future. There is no lower bound: old
//! submissions are accepted.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use cdm_core::temporal::parse_iso8601;
use cdm_core::{RecordValidator, RunProfile, Violation};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::contact::present;
use crate::fields::FieldReader;

/// Log profile of the metadata validator.
pub const METADATA_PROFILE: RunProfile = RunProfile {
    title: "Metadata Validation Results",
    log_file: "metadata-validation.log",
    record_noun: "metadata",
    failure_label: "Metadata validation error",
    failure_banner: "Metadata validation failed!",
};

static SUBMISSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{13}-[a-z0-9]{9}$").unwrap());

static GIT_BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(contact|feature|hotfix)-[a-z0-9]{8}-\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}(-\d{3})?Z?$",
    )
    .unwrap()
});

static SCHEMA_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").unwrap());

static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(\.[a-z0-9]+)*$").unwrap());

/// Fields whose absence is a structural violation.
const REQUIRED_FIELDS: [&str; 4] = ["submissionId", "processedAt", "gitBranch", "commitMessage"];

/// A submission metadata record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionMetadata {
    pub submission_id: Option<String>,
    pub processed_at: Option<String>,
    pub git_branch: Option<String>,
    pub commit_message: Option<String>,
    pub schema_version: Option<String>,
    pub namespace: Option<String>,
    /// Kept untyped so negative and fractional counts are reported as rule
    /// violations rather than type mismatches.
    pub record_count: Option<Value>,
    pub contact_id: Option<String>,
}

impl SubmissionMetadata {
    /// Read metadata from a JSON value, field by field.
    ///
    /// Returns the metadata together with one structural violation per
    /// mistyped field.
    pub fn from_value(value: &Value) -> (Self, Vec<Violation>) {
        let mut reader = FieldReader::new(value, "metadata");
        let meta = Self {
            submission_id: reader.string("submissionId"),
            processed_at: reader.string("processedAt"),
            git_branch: reader.string("gitBranch"),
            commit_message: reader.string("commitMessage"),
            schema_version: reader.string("schemaVersion"),
            namespace: reader.string("namespace"),
            record_count: reader.raw("recordCount").cloned(),
            contact_id: reader.string("contactId"),
        };
        (meta, reader.finish())
    }

    /// File name of the contact this submission refers to.
    pub fn expected_contact_file(&self) -> Option<String> {
        present(&self.contact_id)
            .or_else(|| present(&self.submission_id))
            .map(|name| format!("{name}.json"))
    }
}

/// Validates submission metadata against the audit-trail rules.
#[derive(Debug, Clone)]
pub struct MetadataValidator {
    contacts_dir: PathBuf,
    now: Option<DateTime<Utc>>,
}

impl MetadataValidator {
    /// A validator that resolves contact references under `contacts_dir`.
    pub fn new(contacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            contacts_dir: contacts_dir.into(),
            now: None,
        }
    }

    /// Pin "now" for the future-timestamp rule.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Apply every metadata rule to one record. Mistyped fields are
    /// reported first; the remaining rules still run.
    pub fn validate_metadata(&self, record: &Value) -> Vec<Violation> {
        let (meta, mut violations) = SubmissionMetadata::from_value(record);
        check_required(record, &mut violations);
        check_submission_id(&meta, &mut violations);
        check_processed_at(&meta, self.now(), &mut violations);
        check_git_branch(&meta, &mut violations);
        check_schema_version(&meta, &mut violations);
        check_namespace(&meta, &mut violations);
        check_record_count(&meta, &mut violations);
        self.check_contact_exists(&meta, &mut violations);
        violations
    }

    fn check_contact_exists(&self, meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
        if present(&meta.submission_id).is_none() {
            return;
        }
        let Some(file_name) = meta.expected_contact_file() else {
            return;
        };
        if file_name.contains(['/', '\\']) || file_name.starts_with("..") {
            out.push(Violation::referential(format!(
                "contact reference {file_name:?} is not a plain file name"
            )));
            return;
        }
        let expected = self.contacts_dir.join(&file_name);
        if !expected.is_file() {
            out.push(Violation::referential(format!(
                "referenced contact file {file_name} not found in {}",
                self.contacts_dir.display()
            )));
        }
    }
}

impl RecordValidator for MetadataValidator {
    fn profile(&self) -> &RunProfile {
        &METADATA_PROFILE
    }

    fn validate_record(&mut self, _path: &Path, record: &Value) -> Vec<Violation> {
        self.validate_metadata(record)
    }
}

/// A required field is missing when absent, `null` or blank. A present
/// value of the wrong type is reported as a mismatch instead.
fn check_required(record: &Value, out: &mut Vec<Violation>) {
    for name in REQUIRED_FIELDS {
        let missing = match record.get(name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            out.push(Violation::structural(format!(
                "missing required field: {name}"
            )));
        }
    }
}

fn check_submission_id(meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
    if let Some(id) = present(&meta.submission_id) {
        if !SUBMISSION_ID_RE.is_match(id) {
            out.push(Violation::semantic(format!(
                "submissionId {id:?} must match <13 digits>-<9 lowercase alphanumerics>"
            )));
        }
    }
}

fn check_processed_at(meta: &SubmissionMetadata, now: DateTime<Utc>, out: &mut Vec<Violation>) {
    let Some(raw) = present(&meta.processed_at) else {
        return;
    };
    match parse_iso8601(raw) {
        Ok(at) if at > now => out.push(Violation::semantic(format!(
            "processedAt {raw:?} is in the future"
        ))),
        Ok(_) => {}
        Err(_) => out.push(Violation::semantic(format!(
            "processedAt {raw:?} is not a valid ISO-8601 timestamp"
        ))),
    }
}

fn check_git_branch(meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
    if let Some(branch) = present(&meta.git_branch) {
        if !GIT_BRANCH_RE.is_match(branch) {
            out.push(Violation::semantic(format!(
                "gitBranch {branch:?} must look like (contact|feature|hotfix)-<8 chars>-<timestamp>"
            )));
        }
    }
}

fn check_schema_version(meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
    if let Some(version) = present(&meta.schema_version) {
        if !SCHEMA_VERSION_RE.is_match(version) {
            out.push(Violation::semantic(format!(
                "schemaVersion {version:?} must be major.minor"
            )));
        }
    }
}

fn check_namespace(meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
    if let Some(ns) = present(&meta.namespace) {
        if !NAMESPACE_RE.is_match(ns) {
            out.push(Violation::semantic(format!(
                "namespace {ns:?} must be dot-separated lowercase segments"
            )));
        }
    }
}

fn check_record_count(meta: &SubmissionMetadata, out: &mut Vec<Violation>) {
    match &meta.record_count {
        None | Some(Value::Null) => {}
        Some(v) if v.as_u64().is_some() => {}
        Some(v) => out.push(Violation::semantic(format!(
            "recordCount {v} must be a non-negative integer"
        ))),
    }
}
