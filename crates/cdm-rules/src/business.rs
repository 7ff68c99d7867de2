//! # Business Rules Validation
//!
//! Ten policy rules over contact records. Every rule runs on every record;
//! none short-circuits another.
//!
//! | # | Rule |
//! |---|------|
//! | 1 | Email domain is not a disposable provider |
//! | 2 | Phone matches the country's pattern, when one is known |
//! | 3 | `jobTitle` requires `company` |
//! | 4 | US contacts with a `city` require `stateProvince` |
//! | 5 | `country` is in the allow-list |
//! | 6 | Name quality: no stray "test", at least two name tokens |
//! | 7 | Personal email with a company: logged only |
//! | 8 | Free-form tags are at most 20 characters |
//! | 9 | Notes contain no sensitive data |
//! | 10 | Email is unique within the run |
//!
//! Uniqueness (rule 10) is scoped to one [`BusinessRulesValidator`]: the
//! [`EmailRegistry`] lives in memory and is dropped with the validator, so
//! nothing carries over between runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cdm_core::{RecordValidator, RunProfile, Violation};
use serde_json::Value;

use crate::contact::{present, Contact};
use crate::tables;

/// Log profile of the business rules validator.
pub const BUSINESS_PROFILE: RunProfile = RunProfile {
    title: "Business Rules Validation Results",
    log_file: "business-rules-validation.log",
    record_noun: "contact",
    failure_label: "Business rule violation",
    failure_banner: "Business rules validation failed!",
};

/// Normalized email addresses seen so far in one run, with the file that
/// first used each.
#[derive(Debug, Default)]
pub struct EmailRegistry {
    seen: HashMap<String, PathBuf>,
}

impl EmailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `email` for `path`. Returns the file that registered it first
    /// if the address was already taken.
    pub fn register(&mut self, email: String, path: &Path) -> Option<&Path> {
        use std::collections::hash_map::Entry;
        match self.seen.entry(email) {
            Entry::Occupied(first) => Some(first.into_mut().as_path()),
            Entry::Vacant(slot) => {
                slot.insert(path.to_path_buf());
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Validates contacts against the business rules.
#[derive(Debug, Default)]
pub struct BusinessRulesValidator {
    registry: EmailRegistry,
}

impl BusinessRulesValidator {
    /// A validator with an empty email registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Email addresses registered so far in this run.
    pub fn registry(&self) -> &EmailRegistry {
        &self.registry
    }

    /// Apply all ten rules to one record. Mistyped fields are reported
    /// first and read as absent by the rules.
    pub fn validate_contact(&mut self, path: &Path, record: &Value) -> Vec<Violation> {
        let (contact, mut violations) = Contact::from_value(record);
        check_blocked_domain(&contact, &mut violations);
        check_phone_for_country(&contact, &mut violations);
        check_job_title_requires_company(&contact, &mut violations);
        check_us_state_province(&contact, &mut violations);
        check_allowed_country(&contact, &mut violations);
        check_name_quality(&contact, &mut violations);
        note_personal_email_with_company(&contact, path);
        check_tags(&contact, &mut violations);
        check_sensitive_notes(&contact, &mut violations);
        self.check_duplicate_email(&contact, path, &mut violations);
        violations
    }

    fn check_duplicate_email(
        &mut self,
        contact: &Contact,
        path: &Path,
        out: &mut Vec<Violation>,
    ) {
        let Some(email) = contact.normalized_email() else {
            return;
        };
        if let Some(first) = self.registry.register(email.clone(), path) {
            out.push(Violation::semantic(format!(
                "duplicate emailAddress {email:?} (first seen in {})",
                first.display()
            )));
        }
    }
}

impl RecordValidator for BusinessRulesValidator {
    fn profile(&self) -> &RunProfile {
        &BUSINESS_PROFILE
    }

    fn validate_record(&mut self, path: &Path, record: &Value) -> Vec<Violation> {
        self.validate_contact(path, record)
    }
}

fn check_blocked_domain(contact: &Contact, out: &mut Vec<Violation>) {
    if let Some(domain) = contact.email_domain() {
        if tables::is_blocked_domain(&domain) {
            out.push(Violation::semantic(format!(
                "email domain {domain:?} is a blocked disposable-mail provider"
            )));
        }
    }
}

fn check_phone_for_country(contact: &Contact, out: &mut Vec<Violation>) {
    let (Some(phone), Some(country)) = (present(&contact.phone_number), present(&contact.country))
    else {
        return;
    };
    let Some(pattern) = tables::phone_pattern(country) else {
        return;
    };
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if !pattern.is_match(&digits) {
        out.push(Violation::semantic(format!(
            "phoneNumber {phone:?} does not match the format for {country}"
        )));
    }
}

fn check_job_title_requires_company(contact: &Contact, out: &mut Vec<Violation>) {
    if present(&contact.job_title).is_some() && present(&contact.company).is_none() {
        out.push(Violation::semantic("jobTitle is set but company is missing"));
    }
}

fn check_us_state_province(contact: &Contact, out: &mut Vec<Violation>) {
    if present(&contact.country) == Some("US")
        && present(&contact.city).is_some()
        && present(&contact.state_province).is_none()
    {
        out.push(Violation::semantic(
            "US contacts with a city must include stateProvince",
        ));
    }
}

fn check_allowed_country(contact: &Contact, out: &mut Vec<Violation>) {
    if let Some(country) = present(&contact.country) {
        if !tables::is_allowed_country(country) {
            out.push(Violation::semantic(format!(
                "country {country:?} is not in the allowed country list"
            )));
        }
    }
}

fn check_name_quality(contact: &Contact, out: &mut Vec<Violation>) {
    let Some(name) = contact.full_name.as_deref() else {
        return;
    };
    let email = contact.email_address.as_deref().unwrap_or("");
    if name.to_lowercase().contains("test") && !email.to_lowercase().contains("test") {
        out.push(Violation::semantic(format!(
            "fullName {name:?} looks like test data but emailAddress does not"
        )));
    }
    if name.split_whitespace().count() < 2 {
        out.push(Violation::semantic(format!(
            "fullName {name:?} must contain at least a first and last name"
        )));
    }
}

fn note_personal_email_with_company(contact: &Contact, path: &Path) {
    let (Some(domain), Some(company)) = (contact.email_domain(), present(&contact.company)) else {
        return;
    };
    if tables::is_personal_domain(&domain) {
        tracing::info!(
            file = %path.display(),
            domain = %domain,
            company = %company,
            "business contact uses a personal email domain"
        );
    }
}

fn check_tags(contact: &Contact, out: &mut Vec<Violation>) {
    for tag in &contact.tags {
        if !tables::is_known_tag(tag) && tag.chars().count() > tables::MAX_FREEFORM_TAG_LEN {
            out.push(Violation::semantic(format!(
                "tag {tag:?} is not a standard tag and exceeds {} characters",
                tables::MAX_FREEFORM_TAG_LEN
            )));
        }
    }
}

fn check_sensitive_notes(contact: &Contact, out: &mut Vec<Violation>) {
    let Some(notes) = present(&contact.notes) else {
        return;
    };
    for (name, pattern) in tables::sensitive_patterns() {
        if pattern.is_match(notes) {
            out.push(Violation::semantic(format!(
                "notes contain potentially sensitive data ({name})"
            )));
        }
    }
}
