//! # CDM Semantic Rules
//!
//! Applied to structurally valid contacts, in fixed order, each checked
//! independently:
//!
//! 1. `contactId` is a v1–v5 UUID (case-insensitive).
//! 2. `emailAddress` is already lowercase.
//! 3. `createdAt` / `modifiedAt`, when present, are canonical ISO-8601.
//! 4. `modifiedAt` is not earlier than `createdAt`.

use std::sync::LazyLock;

use cdm_core::temporal::{is_canonical_iso8601, parse_iso8601};
use cdm_core::Violation;
use regex::Regex;
use serde_json::Value;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .unwrap()
});

const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "modifiedAt"];

/// Run every CDM semantic rule against `record`.
pub fn semantic_violations(record: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_contact_id(record, &mut violations);
    check_email_lowercase(record, &mut violations);
    check_timestamp_format(record, &mut violations);
    check_timestamp_order(record, &mut violations);
    violations
}

/// Returns `true` if `id` is a v1–v5 UUID in hyphenated form.
pub fn is_valid_uuid(id: &str) -> bool {
    UUID_RE.is_match(id)
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn check_contact_id(record: &Value, out: &mut Vec<Violation>) {
    let Some(id) = str_field(record, "contactId") else {
        return;
    };
    if !is_valid_uuid(id) {
        out.push(Violation::semantic(format!(
            "CDM compliance: contactId {id:?} is not a valid UUID (v1-v5)"
        )));
    }
}

fn check_email_lowercase(record: &Value, out: &mut Vec<Violation>) {
    let Some(email) = str_field(record, "emailAddress") else {
        return;
    };
    if email != email.to_lowercase() {
        out.push(Violation::semantic(format!(
            "CDM compliance: emailAddress {email:?} must be lowercase"
        )));
    }
}

fn check_timestamp_format(record: &Value, out: &mut Vec<Violation>) {
    for field in TIMESTAMP_FIELDS {
        if let Some(ts) = str_field(record, field) {
            if !is_canonical_iso8601(ts) {
                out.push(Violation::semantic(format!(
                    "CDM compliance: {field} {ts:?} is not a valid ISO-8601 timestamp \
                     (expected YYYY-MM-DDTHH:MM:SS.sssZ)"
                )));
            }
        }
    }
}

fn check_timestamp_order(record: &Value, out: &mut Vec<Violation>) {
    let (Some(created), Some(modified)) = (
        str_field(record, "createdAt"),
        str_field(record, "modifiedAt"),
    ) else {
        return;
    };
    // Format problems are reported by check_timestamp_format.
    let (Ok(created_at), Ok(modified_at)) = (parse_iso8601(created), parse_iso8601(modified))
    else {
        return;
    };
    if modified_at < created_at {
        out.push(Violation::semantic(format!(
            "CDM compliance: modifiedAt {modified:?} is earlier than createdAt {created:?}"
        )));
    }
}
