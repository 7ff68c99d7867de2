//! # cdm-report — Validation Report Aggregator
//!
//! Runs after the three validators. Reads their logs, classifies each as
//! passed, failed or unknown, counts input files independently of the
//! validators, and renders `validation-report.json` and
//! `validation-report.md`.
//!
//! ## Architecture
//!
//! ```text
//! cdm-validation.log            ─┐
//! business-rules-validation.log ─┼─> parse ─> aggregate ─> render (JSON, Markdown)
//! metadata-validation.log       ─┘
//! ```
//!
//! A validator that crashed before writing its log is `unknown`, and
//! `unknown` fails the overall status just like `failed` does.

pub mod parse;
pub mod render;
pub mod report;

pub use parse::{parse_log, read_log, ValidatorStatus};
pub use render::render_markdown;
pub use report::{
    aggregate, write_reports, FileCount, ReportContext, ReportError, ValidationReport,
    ValidationResults, ValidatorResult, JSON_REPORT_FILE, MARKDOWN_REPORT_FILE,
};
