//! # Violations
//!
//! A [`Violation`] is one human-readable reason a record failed validation.
//! Violations live only for the duration of a run and end up as indented
//! lines under the file's `❌` entry in the validation log.

use serde::Serialize;

/// Classification of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The file is not well-formed JSON.
    ParseError,
    /// Schema shape, type or bound failure.
    StructuralViolation,
    /// CDM, business or metadata rule failure.
    SemanticViolation,
    /// Metadata references a contact file that does not exist.
    ReferentialViolation,
    /// I/O or other failure while processing one file.
    UnexpectedError,
}

impl ViolationKind {
    /// Label used when rendering the violation into a log line.
    pub fn label(self) -> &'static str {
        match self {
            Self::ParseError => "parse error",
            Self::StructuralViolation => "structural violation",
            Self::SemanticViolation => "semantic violation",
            Self::ReferentialViolation => "referential violation",
            Self::UnexpectedError => "unexpected error",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One reason a record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// What class of check produced this violation.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a violation of an arbitrary kind.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::ParseError, message)
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::StructuralViolation, message)
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::SemanticViolation, message)
    }

    pub fn referential(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::ReferentialViolation, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::UnexpectedError, message)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
