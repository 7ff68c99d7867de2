//! # cdm-cli — CLI for the CDM Gate
//!
//! Provides the `cdm-gate` command-line interface. Each subcommand is one
//! CI job step:
//!
//! ```bash
//! cdm-gate schema           # writes cdm-validation.log
//! cdm-gate business-rules   # writes business-rules-validation.log
//! cdm-gate metadata         # writes metadata-validation.log
//! cdm-gate report           # reads the three logs, writes validation-report.{json,md}
//! ```
//!
//! Validators exit 1 when any file is invalid; `report` exits 1 unless all
//! three validators passed.

pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cdm_core::config::find_repo_root;
use cdm_core::{GateConfig, ResolvedPaths};

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `repo_root` resolves there; otherwise it is taken relative to the
/// current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Determine the repository root: `explicit` if given, else the nearest
/// ancestor of the current directory holding `.git` or `cdm-gate.yaml`,
/// else the current directory.
pub fn resolve_repo_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_repo_root(&cwd).unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        cwd
    })
}

/// Load the gate configuration and resolve its directories.
///
/// With `config`, that file must load. Without it, `cdm-gate.yaml` at the
/// repository root is used when present.
pub fn load_paths(config: Option<&Path>, repo_root: &Path) -> Result<ResolvedPaths> {
    let cfg = match config {
        Some(path) => {
            let resolved = resolve_path(path, repo_root);
            GateConfig::load(&resolved)
                .with_context(|| format!("failed to load config {}", resolved.display()))?
        }
        None => GateConfig::discover(repo_root).context("failed to load cdm-gate.yaml")?,
    };
    Ok(cfg.resolve(repo_root))
}
