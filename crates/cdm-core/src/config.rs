//! # Gate Configuration
//!
//! Directory layout of the repository being gated. All paths are relative
//! to the repository root unless given as absolute paths. Rule tables are
//! deliberately not configurable.
//!
//! ```yaml
//! # cdm-gate.yaml
//! contacts_dir: data/contacts
//! submissions_dir: data/submissions
//! log_dir: .
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CdmError;

/// File name looked up at the repository root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cdm-gate.yaml";

pub const DEFAULT_CONTACTS_DIR: &str = "data/contacts";
pub const DEFAULT_SUBMISSIONS_DIR: &str = "data/submissions";

/// Directory layout for one gate invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Contact records, one JSON file per contact.
    pub contacts_dir: PathBuf,
    /// Submission metadata records.
    pub submissions_dir: PathBuf,
    /// Where validation logs and reports are written.
    pub log_dir: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            contacts_dir: PathBuf::from(DEFAULT_CONTACTS_DIR),
            submissions_dir: PathBuf::from(DEFAULT_SUBMISSIONS_DIR),
            log_dir: PathBuf::from("."),
        }
    }
}

impl GateConfig {
    /// Load a configuration from a YAML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CdmError::Config`] if the file cannot be read or is not a
    /// valid configuration document.
    pub fn load(path: &Path) -> Result<Self, CdmError> {
        let content = std::fs::read_to_string(path).map_err(|e| CdmError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|reason| CdmError::Config {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `<repo_root>/cdm-gate.yaml` if present, else the defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`GateConfig::load`] errors for a present but broken file.
    pub fn discover(repo_root: &Path) -> Result<Self, CdmError> {
        let candidate = repo_root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading gate config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve every directory against `repo_root`.
    pub fn resolve(&self, repo_root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            repo_root: repo_root.to_path_buf(),
            contacts_dir: repo_root.join(&self.contacts_dir),
            submissions_dir: repo_root.join(&self.submissions_dir),
            log_dir: repo_root.join(&self.log_dir),
        }
    }
}

/// Absolute directory layout derived from a [`GateConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub repo_root: PathBuf,
    pub contacts_dir: PathBuf,
    pub submissions_dir: PathBuf,
    pub log_dir: PathBuf,
}

/// Walk up from `start` to the first directory holding `.git` or
/// [`DEFAULT_CONFIG_FILE`].
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(".git").exists() || dir.join(DEFAULT_CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
