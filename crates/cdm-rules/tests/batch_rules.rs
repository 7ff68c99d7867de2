//! Integration tests: business and metadata validators driven through the
//! batch runner over fixture repositories.

use std::path::Path;

use cdm_core::batch::SUCCESS_PHRASE;
use cdm_core::BatchRunner;
use cdm_rules::{BusinessRulesValidator, MetadataValidator};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn contact(email: &str) -> Value {
    json!({
        "contactId": uuid::Uuid::new_v4().to_string(),
        "fullName": "John Doe",
        "emailAddress": email,
        "country": "US",
        "city": "San Francisco",
        "stateProvince": "CA"
    })
}

#[test]
fn second_duplicate_email_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let contacts = dir.path().join("data/contacts");
    write(&contacts, "a.json", &contact("john.doe@example.com"));
    write(&contacts, "b.json", &contact("John.Doe@example.com"));

    let runner = BatchRunner::new(dir.path());
    let mut validator = BusinessRulesValidator::new();
    let report = runner.run_dir(&mut validator, Path::new("data/contacts"));

    assert_eq!(report.total, 2);
    assert_eq!(report.invalid, 1);
    assert!(report.failures[0].path.ends_with("b.json"));
    assert!(report.failures[0].violations[0]
        .message
        .contains("duplicate"));
}

#[test]
fn single_file_is_valid_and_runs_do_not_share_state() {
    let dir = tempfile::tempdir().unwrap();
    let contacts = dir.path().join("data/contacts");
    write(&contacts, "a.json", &contact("john.doe@example.com"));

    let runner = BatchRunner::new(dir.path());
    for _ in 0..2 {
        let mut validator = BusinessRulesValidator::new();
        let report = runner.run_dir(&mut validator, Path::new("data/contacts"));
        assert_eq!(report.valid, 1);
        assert_eq!(report.exit_code(), 0);
    }
}

#[test]
fn business_rules_leave_no_scratch_files() {
    let dir = tempfile::tempdir().unwrap();
    let contacts = dir.path().join("data/contacts");
    write(&contacts, "a.json", &contact("john.doe@example.com"));
    write(&contacts, "b.json", &contact("john.doe@example.com"));

    let before: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    let mut validator = BusinessRulesValidator::new();
    BatchRunner::new(dir.path()).run_dir(&mut validator, Path::new("data/contacts"));
    let after: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(before.len(), after.len());
}

#[test]
fn end_to_end_invalid_contact_fails_business_rules() {
    let dir = tempfile::tempdir().unwrap();
    let contacts = dir.path().join("data/contacts");
    write(
        &contacts,
        "bad.json",
        &json!({
            "fullName": "",
            "emailAddress": "invalid-email",
            "country": "XX",
            "jobTitle": "Manager"
        }),
    );
    let mut validator = BusinessRulesValidator::new();
    let report = BatchRunner::new(dir.path()).run_dir(&mut validator, Path::new("data/contacts"));
    assert_eq!(report.invalid, 1);
    let messages: Vec<_> = report.failures[0]
        .violations
        .iter()
        .map(|v| v.message.clone())
        .collect();
    assert!(messages.iter().any(|m| m.contains("company")));
    assert!(messages.iter().any(|m| m.contains("\"XX\"")));
}

#[test]
fn metadata_batch_checks_references_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let contacts = dir.path().join("data/contacts");
    let submissions = dir.path().join("data/submissions");
    let id = "550e8400-e29b-41d4-a716-446655440000";
    write(&contacts, &format!("{id}.json"), &contact("a@example.com"));

    let meta = |contact_id: &str| {
        json!({
            "submissionId": "1717243200000-abc123xyz",
            "processedAt": "2024-06-01T11:59:00.000Z",
            "gitBranch": "contact-a1b2c3d4-2024-06-01T11-58-00-000Z",
            "commitMessage": "Add contact",
            "contactId": contact_id
        })
    };
    write(&submissions.join("2024/06"), "ok.json", &meta(id));
    write(&submissions, "dangling.json", &meta("missing-contact"));

    let now = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
    let mut validator = MetadataValidator::new(&contacts).with_clock(now);
    let report =
        BatchRunner::new(dir.path()).run_dir(&mut validator, Path::new("data/submissions"));

    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 1);
    assert!(report.failures[0].path.ends_with("dangling.json"));
    let log = report.render_log(dir.path());
    assert!(log.contains("❌ Metadata validation error: data/submissions/dangling.json"));
    assert!(log.contains("referential violation"));
}

#[test]
fn metadata_empty_directory_passes() {
    let dir = tempfile::tempdir().unwrap();
    let mut validator = MetadataValidator::new(dir.path().join("data/contacts"));
    let report =
        BatchRunner::new(dir.path()).run_dir(&mut validator, Path::new("data/submissions"));
    assert_eq!(report.exit_code(), 0);
    let log = report.render_log(dir.path());
    assert!(log.contains("No metadata files found to validate."));
    assert!(log.contains(SUCCESS_PHRASE));
}

proptest! {
    #[test]
    fn processed_at_after_now_always_fails(offset_secs in 1i64..10_000_000) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let future = now + Duration::seconds(offset_secs);
        let record = json!({
            "processedAt": future.to_rfc3339(),
        });
        let validator = MetadataValidator::new("/nonexistent").with_clock(now);
        let violations = validator.validate_metadata(&record);
        prop_assert!(violations.iter().any(|v| v.message.contains("in the future")));
    }

    #[test]
    fn processed_at_before_now_never_future(offset_secs in 0i64..10_000_000) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let past = now - Duration::seconds(offset_secs);
        let record = json!({ "processedAt": past.to_rfc3339() });
        let validator = MetadataValidator::new("/nonexistent").with_clock(now);
        let violations = validator.validate_metadata(&record);
        prop_assert!(!violations.iter().any(|v| v.message.contains("processedAt")));
    }
}
