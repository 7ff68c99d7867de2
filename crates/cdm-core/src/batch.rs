//! # Batch Runner
//!
//! The shared contract of every validator: discover files, validate each,
//! aggregate counts, write a fixed-phrase log, and set the exit status.
//! Validators implement [`RecordValidator`]; everything else lives here.
//!
//! ## Log contract
//!
//! ```text
//! <title>
//! =======
//!
//! Total files: N
//! Valid files: N
//! Invalid files: N
//!
//! Details:
//! ❌ <failure label>: <relative path>
//!    - [<kind>] <message>
//!
//! ❌ <Validator> validation failed!      (or ✅ All validation checks passed!)
//! ```
//!
//! The report aggregator classifies a log by its final line, which is the
//! only place [`SUCCESS_PHRASE`] and [`FAILURE_PHRASE`] may appear. Record
//! values echoed into detail lines have both phrases scrubbed.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::discovery::find_json_files;
use crate::error::CdmError;
use crate::violation::Violation;

/// Phrase that marks a passing log.
pub const SUCCESS_PHRASE: &str = "All validation checks passed!";

/// Phrase that marks a failing log. Every [`RunProfile::failure_banner`]
/// ends with it.
pub const FAILURE_PHRASE: &str = "validation failed!";

/// Marker prefixed to each failing file in the `Details:` section.
pub const FAILURE_MARKER: &str = "❌";

/// Marker prefixed to the success phrase on a passing log's final line.
pub const SUCCESS_MARKER: &str = "✅";

/// Replacement for a verdict phrase found inside echoed record content.
const SCRUBBED_PHRASE: &str = "[verdict phrase removed]";

/// Remove both verdict phrases from text that did not come from the runner.
pub fn scrub_verdict_phrases(text: &str) -> String {
    text.replace(SUCCESS_PHRASE, SCRUBBED_PHRASE)
        .replace(FAILURE_PHRASE, SCRUBBED_PHRASE)
}

/// Static description of one validator's log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProfile {
    /// First line of the log.
    pub title: &'static str,
    /// File name of the log, written to the configured log directory.
    pub log_file: &'static str,
    /// Noun used in the "no files found" line (`contact`, `metadata`).
    pub record_noun: &'static str,
    /// Label on each `❌ <label>: <path>` line.
    pub failure_label: &'static str,
    /// Closing line of a failing log.
    pub failure_banner: &'static str,
}

/// A per-record validation function with its log profile.
pub trait RecordValidator {
    /// The log profile for this validator.
    fn profile(&self) -> &RunProfile;

    /// Validate one parsed record. An empty vector means the record is valid.
    ///
    /// Takes `&mut self` so validators can carry run-scoped state, such as
    /// the duplicate-email registry of the business rules validator.
    fn validate_record(&mut self, path: &Path, record: &Value) -> Vec<Violation>;
}

/// A single invalid file and the reasons it failed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    /// Path to the file.
    pub path: PathBuf,
    /// Every violation found in the file.
    pub violations: Vec<Violation>,
}

/// Outcome of one validation run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Profile of the validator that produced this report.
    pub profile: RunProfile,
    /// Number of files discovered.
    pub total: usize,
    /// Number of files without violations.
    pub valid: usize,
    /// Number of files with at least one violation.
    pub invalid: usize,
    /// Details of each invalid file, in discovery order.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    fn empty(profile: RunProfile) -> Self {
        Self {
            profile,
            total: 0,
            valid: 0,
            invalid: 0,
            failures: Vec::new(),
        }
    }

    /// `true` when no file was invalid (including the zero-file case).
    pub fn passed(&self) -> bool {
        self.invalid == 0
    }

    /// Process exit code: 0 on success, 1 if any file is invalid.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Render the human-readable log. Paths are shown relative to `repo_root`.
    pub fn render_log(&self, repo_root: &Path) -> String {
        let mut out = String::new();
        let title = self.profile.title;
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        let _ = writeln!(out);
        let _ = writeln!(out, "Total files: {}", self.total);
        let _ = writeln!(out, "Valid files: {}", self.valid);
        let _ = writeln!(out, "Invalid files: {}", self.invalid);

        if self.total == 0 {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "No {} files found to validate.",
                self.profile.record_noun
            );
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Details:");
            for failure in &self.failures {
                let rel = failure
                    .path
                    .strip_prefix(repo_root)
                    .unwrap_or(&failure.path);
                let _ = writeln!(
                    out,
                    "{FAILURE_MARKER} {}: {}",
                    self.profile.failure_label,
                    scrub_verdict_phrases(&rel.display().to_string())
                );
                for violation in &failure.violations {
                    let _ = writeln!(
                        out,
                        "   - {}",
                        scrub_verdict_phrases(&violation.to_string())
                    );
                }
            }
        }

        let _ = writeln!(out);
        if self.passed() {
            let _ = writeln!(out, "{SUCCESS_MARKER} {SUCCESS_PHRASE}");
        } else {
            let _ = writeln!(out, "{FAILURE_MARKER} {}", self.profile.failure_banner);
        }
        out
    }

    /// Write the rendered log to `log_dir/<profile.log_file>`.
    ///
    /// # Errors
    ///
    /// Returns [`CdmError::LogWrite`] if the directory cannot be created or
    /// the file cannot be written.
    pub fn write_log(&self, log_dir: &Path, repo_root: &Path) -> Result<PathBuf, CdmError> {
        let path = log_dir.join(self.profile.log_file);
        let to_err = |source: std::io::Error| CdmError::LogWrite {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(log_dir).map_err(to_err)?;
        std::fs::write(&path, self.render_log(repo_root)).map_err(to_err)?;
        Ok(path)
    }
}

/// Drives a [`RecordValidator`] over a set of files.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    repo_root: PathBuf,
}

impl BatchRunner {
    /// Create a runner rooted at `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// The repository root this runner resolves directories against.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Discover every `.json` file under `dir` and validate each.
    pub fn run_dir<V: RecordValidator>(&self, validator: &mut V, dir: &Path) -> BatchReport {
        let files = find_json_files(&self.repo_root, dir);
        tracing::info!(
            dir = %dir.display(),
            count = files.len(),
            "discovered files"
        );
        self.run(validator, &files)
    }

    /// Validate an explicit list of files.
    ///
    /// A file that cannot be read or parsed is recorded as invalid and the
    /// batch moves on.
    pub fn run<V: RecordValidator>(&self, validator: &mut V, files: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::empty(*validator.profile());

        for path in files {
            report.total += 1;
            let violations = match load_json(path) {
                Ok(record) => validator.validate_record(path, &record),
                Err(violation) => vec![violation],
            };

            if violations.is_empty() {
                tracing::debug!(file = %path.display(), "valid");
                report.valid += 1;
            } else {
                tracing::info!(
                    file = %path.display(),
                    violations = violations.len(),
                    "invalid"
                );
                report.invalid += 1;
                report.failures.push(FileFailure {
                    path: path.clone(),
                    violations,
                });
            }
        }

        tracing::info!(
            validator = report.profile.title,
            total = report.total,
            valid = report.valid,
            invalid = report.invalid,
            "validation run complete"
        );
        report
    }
}

fn load_json(path: &Path) -> Result<Value, Violation> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Violation::unexpected(format!("failed to read file: {e}")))?;
    serde_json::from_str(&content).map_err(|e| Violation::parse(format!("malformed JSON: {e}")))
}
