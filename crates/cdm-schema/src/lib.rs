//! # cdm-schema — Contact Schema Validation
//!
//! Validates contact records in two layers:
//!
//! 1. **Structural.** The embedded `contact.schema.json` (Draft 2020-12)
//!    checks required fields, types, bounds and rejects unknown keys.
//! 2. **CDM semantic.** Only for structurally valid records: UUID identifier,
//!    lowercase email, canonical ISO-8601 timestamps and their ordering.
//!
//! [`ContactSchemaValidator`] implements
//! [`RecordValidator`](cdm_core::RecordValidator) so the CLI can hand it
//! straight to the batch runner.

pub mod cdm;
pub mod validate;

// Re-export primary types.
pub use validate::{
    ContactSchemaValidator, SchemaSetupError, SchemaValidationDetail, CDM_PROFILE,
    CONTACT_SCHEMA_ID,
};
