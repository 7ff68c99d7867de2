//! # Error Types
//!
//! Operational errors for the CDM gate. These are distinct from
//! [`Violation`](crate::Violation)s: a violation says a record is bad, a
//! [`CdmError`] says the gate itself could not do its job (a log could not
//! be written, a config file is malformed).

use thiserror::Error;

/// Top-level error type for the CDM gate.
#[derive(Error, Debug)]
pub enum CdmError {
    /// A configuration file could not be read or parsed.
    #[error("failed to load config {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A validation log could not be written.
    #[error("failed to write log {path}: {source}")]
    LogWrite {
        /// Path of the log file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A timestamp string was not valid ISO-8601.
    #[error("invalid ISO-8601 timestamp {0:?}")]
    InvalidTimestamp(String),
}
