//! # cdm-rules — Business and Metadata Rules
//!
//! Two validators, both driven by [`cdm_core::BatchRunner`]:
//!
//! - [`BusinessRulesValidator`]: ten independent policy rules over contact
//!   records, including run-scoped email uniqueness.
//! - [`MetadataValidator`]: required fields, formats, freshness and
//!   referential integrity of submission metadata.
//!
//! Rule data (blocked domains, country allow-list, phone patterns, tag
//! vocabulary, sensitive-data patterns) lives in [`tables`] as static
//! configuration; adding an entry requires no control-flow change.

pub mod business;
pub mod contact;
mod fields;
pub mod metadata;
pub mod tables;

pub use business::{BusinessRulesValidator, EmailRegistry, BUSINESS_PROFILE};
pub use contact::Contact;
pub use metadata::{MetadataValidator, SubmissionMetadata, METADATA_PROFILE};
