//! # cdm-core — Foundational Types for the CDM Gate
//!
//! Every validator in the workspace depends on this crate; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Violations are values.** A bad file never aborts a batch. Parse
//!    failures, I/O failures and rule failures all become [`Violation`]s
//!    attached to the file that produced them.
//!
//! 2. **One batch runner.** Discovery, per-file parsing, counting, log
//!    rendering and exit status live in [`batch`]. Validators only supply a
//!    [`RecordValidator`] implementation.
//!
//! 3. **The log is a contract.** The success and failure phrases in
//!    [`batch::SUCCESS_PHRASE`] and [`batch::FAILURE_PHRASE`] are parsed by
//!    the report aggregator and must not change.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod temporal;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use batch::{BatchReport, BatchRunner, FileFailure, RecordValidator, RunProfile};
pub use config::{GateConfig, ResolvedPaths};
pub use discovery::find_json_files;
pub use error::CdmError;
pub use violation::{Violation, ViolationKind};
