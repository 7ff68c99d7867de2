//! # Runtime Contact Schema Validation
//!
//! Validates contact documents against the embedded `contact.schema.json`
//! (Draft 2020-12), then layers the CDM semantic rules from [`crate::cdm`].
//!
//! ## Design
//!
//! The schema is compiled once at construction time. Structural errors are
//! grouped by the JSON Pointer of the violating field: one detail per field,
//! carrying every distinct message for it.
//! When a record fails structurally, semantic rules are not applied: their
//! preconditions (a string `emailAddress`, a string `contactId`) may not hold.

use std::path::Path;

use cdm_core::{RecordValidator, RunProfile, Violation};
use serde_json::Value;
use thiserror::Error;

use crate::cdm;

/// Source of the contact schema, embedded at compile time.
const CONTACT_SCHEMA_JSON: &str = include_str!("../schemas/contact.schema.json");

/// `$id` of the contact schema.
pub const CONTACT_SCHEMA_ID: &str = "https://schemas.cdm-gate.dev/contact.schema.json";

/// Log profile of the schema validator.
pub const CDM_PROFILE: RunProfile = RunProfile {
    title: "CDM Schema Validation Results",
    log_file: "cdm-validation.log",
    record_noun: "contact",
    failure_label: "CDM compliance failure",
    failure_banner: "CDM validation failed!",
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Structural validation error with diagnostic context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationDetail {
    /// The JSON Pointer to the field that failed validation. Empty for the
    /// document root.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for SchemaValidationDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{path}: {}", self.message)
    }
}

/// Errors building the schema validator. These indicate a broken build,
/// never a bad contact record.
#[derive(Error, Debug)]
pub enum SchemaSetupError {
    /// The embedded schema is not valid JSON.
    #[error("failed to parse schema {schema_id}: {reason}")]
    SchemaParse {
        /// The schema `$id`.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompile {
        /// The schema `$id`.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// ContactSchemaValidator
// ---------------------------------------------------------------------------

/// Compiled contact schema plus the CDM semantic rules.
pub struct ContactSchemaValidator {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for ContactSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactSchemaValidator")
            .field("schema_id", &CONTACT_SCHEMA_ID)
            .finish()
    }
}

impl ContactSchemaValidator {
    /// Compile the embedded contact schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaSetupError`] if the embedded schema is unusable.
    pub fn new() -> Result<Self, SchemaSetupError> {
        let schema: Value = serde_json::from_str(CONTACT_SCHEMA_JSON).map_err(|e| {
            SchemaSetupError::SchemaParse {
                schema_id: CONTACT_SCHEMA_ID.to_string(),
                reason: e.to_string(),
            }
        })?;

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&schema)
            .map_err(|e| SchemaSetupError::SchemaCompile {
                schema_id: CONTACT_SCHEMA_ID.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(schema_id = CONTACT_SCHEMA_ID, "compiled contact schema");
        Ok(Self { validator })
    }

    /// Structural errors only, one per violated field path in first-seen
    /// order. Distinct messages for the same path are joined with `; `.
    pub fn structural_errors(&self, value: &Value) -> Vec<SchemaValidationDetail> {
        let mut details: Vec<SchemaValidationDetail> = Vec::new();
        for err in self.validator.iter_errors(value) {
            let instance_path = err.instance_path.to_string();
            let message = err.to_string();
            match details.iter_mut().find(|d| d.instance_path == instance_path) {
                Some(detail) => {
                    if !detail.message.split("; ").any(|m| m == message) {
                        detail.message.push_str("; ");
                        detail.message.push_str(&message);
                    }
                }
                None => details.push(SchemaValidationDetail {
                    instance_path,
                    message,
                }),
            }
        }
        details
    }

    /// Validate a contact: structural checks, then CDM semantic rules.
    ///
    /// Returns every violation found. An empty vector means the contact is
    /// CDM compliant.
    pub fn validate_contact(&self, value: &Value) -> Vec<Violation> {
        let structural = self.structural_errors(value);
        if !structural.is_empty() {
            return structural
                .iter()
                .map(|d| Violation::structural(d.to_string()))
                .collect();
        }
        cdm::semantic_violations(value)
    }
}

impl RecordValidator for ContactSchemaValidator {
    fn profile(&self) -> &RunProfile {
        &CDM_PROFILE
    }

    fn validate_record(&mut self, _path: &Path, record: &Value) -> Vec<Violation> {
        self.validate_contact(record)
    }
}
