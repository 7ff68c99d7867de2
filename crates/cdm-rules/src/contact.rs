//! View of a contact record for the business rules.
//!
//! Lenient: every field is optional and unknown keys are ignored, so the
//! business rules can run on records the schema validator would reject. A
//! field of the wrong type reads as absent and is reported on its own.

use cdm_core::Violation;
use serde_json::Value;

use crate::fields::FieldReader;

/// The contact fields the business rules read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub full_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// Treat empty and whitespace-only strings as absent.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Contact {
    /// Read a contact from a JSON value, field by field.
    ///
    /// Returns the contact together with one structural violation per
    /// mistyped field.
    pub fn from_value(value: &Value) -> (Self, Vec<Violation>) {
        let mut reader = FieldReader::new(value, "contact");
        let contact = Self {
            full_name: reader.string("fullName"),
            email_address: reader.string("emailAddress"),
            phone_number: reader.string("phoneNumber"),
            company: reader.string("company"),
            job_title: reader.string("jobTitle"),
            city: reader.string("city"),
            state_province: reader.string("stateProvince"),
            country: reader.string("country"),
            notes: reader.string("notes"),
            tags: reader.strings("tags"),
        };
        (contact, reader.finish())
    }

    /// Domain part of the email address, lowercased.
    pub fn email_domain(&self) -> Option<String> {
        let email = present(&self.email_address)?;
        let (_, domain) = email.rsplit_once('@')?;
        Some(domain.to_lowercase())
    }

    /// Email address trimmed and lowercased, used as the uniqueness key.
    pub fn normalized_email(&self) -> Option<String> {
        present(&self.email_address).map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(value: Value) -> Contact {
        let (contact, violations) = Contact::from_value(&value);
        assert!(violations.is_empty(), "{violations:?}");
        contact
    }

    #[test]
    fn unknown_and_unused_keys_ignored() {
        let c = read(json!({
            "fullName": "Ann Lee",
            "nickname": "Al",
            "preferredContactMethod": "fax",
            "isActive": "yes",
            "customFields": 7
        }));
        assert_eq!(c.full_name.as_deref(), Some("Ann Lee"));
        assert!(c.tags.is_empty());
    }

    #[test]
    fn wrong_type_is_reported_per_field() {
        let (c, violations) = Contact::from_value(&json!({
            "fullName": 42,
            "company": "Acme Corp"
        }));
        assert_eq!(c.full_name, None);
        assert_eq!(c.company.as_deref(), Some("Acme Corp"));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.starts_with("fullName must be a string"));
    }

    #[test]
    fn email_helpers() {
        let c = read(json!({ "emailAddress": "  Ann.Lee@Example.COM " }));
        assert_eq!(c.email_domain().as_deref(), Some("example.com"));
        assert_eq!(c.normalized_email().as_deref(), Some("ann.lee@example.com"));
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(" x ".to_string())), Some("x"));
    }
}
