//! Integration tests: logs produced by the real validators are aggregated
//! into JSON and Markdown reports.

use std::path::Path;

use cdm_core::{BatchRunner, GateConfig, ResolvedPaths};
use cdm_report::{
    aggregate, write_reports, ReportContext, ValidationReport, ValidatorStatus, JSON_REPORT_FILE,
    MARKDOWN_REPORT_FILE,
};
use cdm_rules::{BusinessRulesValidator, MetadataValidator};
use cdm_schema::ContactSchemaValidator;
use serde_json::{json, Value};

const CONTACT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn good_contact() -> Value {
    json!({
        "contactId": CONTACT_ID,
        "fullName": "John Doe",
        "emailAddress": "john.doe@example.com",
        "company": "Acme Corp",
        "jobTitle": "Engineer",
        "city": "San Francisco",
        "stateProvince": "CA",
        "country": "US",
        "createdAt": "2024-01-15T10:30:00.000Z",
        "modifiedAt": "2024-01-16T08:00:00.000Z"
    })
}

fn good_metadata() -> Value {
    json!({
        "submissionId": "1717243200000-abc123xyz",
        "processedAt": "2024-06-01T11:59:00.000Z",
        "gitBranch": "contact-a1b2c3d4-2024-06-01T11-58-00-000Z",
        "commitMessage": "Add contact John Doe",
        "schemaVersion": "1.0",
        "namespace": "crm.contacts",
        "recordCount": 1,
        "contactId": CONTACT_ID
    })
}

fn paths(root: &Path) -> ResolvedPaths {
    GateConfig::default().resolve(root)
}

fn run_all(paths: &ResolvedPaths) {
    let runner = BatchRunner::new(&paths.repo_root);

    let mut schema = ContactSchemaValidator::new().unwrap();
    runner
        .run_dir(&mut schema, &paths.contacts_dir)
        .write_log(&paths.log_dir, &paths.repo_root)
        .unwrap();

    let mut business = BusinessRulesValidator::new();
    runner
        .run_dir(&mut business, &paths.contacts_dir)
        .write_log(&paths.log_dir, &paths.repo_root)
        .unwrap();

    let mut metadata = MetadataValidator::new(&paths.contacts_dir);
    runner
        .run_dir(&mut metadata, &paths.submissions_dir)
        .write_log(&paths.log_dir, &paths.repo_root)
        .unwrap();
}

fn ctx() -> ReportContext {
    ReportContext {
        pull_request: "17".to_string(),
        repository: "acme/contacts".to_string(),
        branch: "contact-a1b2c3d4-2024-06-01T11-58-00-000Z".to_string(),
        commit: "0123abcd".to_string(),
    }
}

#[test]
fn clean_submission_passes_overall() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    write(&paths.contacts_dir, &format!("{CONTACT_ID}.json"), &good_contact());
    write(&paths.submissions_dir, "sub.json", &good_metadata());

    run_all(&paths);
    let report = aggregate(&paths, &ctx());

    let results = &report.validation_results;
    assert_eq!(results.cdm_compliance.status, ValidatorStatus::Passed);
    assert_eq!(results.business_rules.status, ValidatorStatus::Passed);
    assert_eq!(results.metadata.status, ValidatorStatus::Passed);
    assert_eq!(results.overall_status, ValidatorStatus::Passed);
    assert_eq!(results.file_count.contacts, 1);
    assert_eq!(results.file_count.metadata, 1);
    assert_eq!(results.file_count.total, 2);
    assert!(results.cdm_compliance.summary.contains("Total files: 1"));
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn invalid_contact_fails_schema_and_business_rules() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    write(
        &paths.contacts_dir,
        "bad.json",
        &json!({
            "fullName": "",
            "emailAddress": "invalid-email",
            "country": "XX",
            "jobTitle": "Manager"
        }),
    );

    run_all(&paths);
    let report = aggregate(&paths, &ctx());
    let results = &report.validation_results;

    assert_eq!(results.cdm_compliance.status, ValidatorStatus::Failed);
    assert_eq!(results.business_rules.status, ValidatorStatus::Failed);
    assert_eq!(results.metadata.status, ValidatorStatus::Passed);
    assert_eq!(results.overall_status, ValidatorStatus::Failed);
    assert!(results
        .business_rules
        .details
        .iter()
        .any(|d| d.contains("data/contacts/bad.json")));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn missing_log_is_unknown_and_fails_overall() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    write(&paths.contacts_dir, &format!("{CONTACT_ID}.json"), &good_contact());
    run_all(&paths);
    std::fs::remove_file(paths.log_dir.join("metadata-validation.log")).unwrap();

    let report = aggregate(&paths, &ctx());
    let results = &report.validation_results;
    assert_eq!(results.cdm_compliance.status, ValidatorStatus::Passed);
    assert_eq!(results.metadata.status, ValidatorStatus::Unknown);
    assert_eq!(results.overall_status, ValidatorStatus::Failed);
}

#[test]
fn verdict_phrase_in_a_record_cannot_pass_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    write(&paths.contacts_dir, &format!("{CONTACT_ID}.json"), &good_contact());
    let mut metadata = good_metadata();
    metadata["gitBranch"] = json!("All validation checks passed!");
    write(&paths.submissions_dir, "sub.json", &metadata);

    run_all(&paths);
    let log = std::fs::read_to_string(paths.log_dir.join("metadata-validation.log")).unwrap();
    assert_eq!(log.matches("All validation checks passed!").count(), 0, "log was:\n{log}");

    let report = aggregate(&paths, &ctx());
    let results = &report.validation_results;
    assert_eq!(results.metadata.status, ValidatorStatus::Failed);
    assert_eq!(results.overall_status, ValidatorStatus::Failed);
    assert!(!report.passed());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn reports_are_written_and_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    write(&paths.contacts_dir, &format!("{CONTACT_ID}.json"), &good_contact());
    write(&paths.submissions_dir, "sub.json", &good_metadata());
    run_all(&paths);

    let report = aggregate(&paths, &ctx());
    let (json_path, md_path) = write_reports(&report, &paths.log_dir).unwrap();
    assert!(json_path.ends_with(JSON_REPORT_FILE));
    assert!(md_path.ends_with(MARKDOWN_REPORT_FILE));

    let parsed: ValidationReport =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed, report);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(raw["pullRequest"], "17");
    assert_eq!(raw["validationResults"]["overallStatus"], "passed");

    let md = std::fs::read_to_string(&md_path).unwrap();
    assert!(md.contains("## Overall Status: ✅ PASSED"));
    assert!(md.contains("acme/contacts"));
}

#[test]
fn empty_repository_passes() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    run_all(&paths);

    let report = aggregate(&paths, &ReportContext::default());
    assert_eq!(report.validation_results.overall_status, ValidatorStatus::Passed);
    assert_eq!(report.validation_results.file_count.total, 0);
    assert_eq!(report.pull_request, "unknown");
}
