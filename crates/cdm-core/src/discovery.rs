//! # File Discovery
//!
//! Recursively lists `.json` files under a directory given relative to the
//! repository root. A missing directory is not an error: the gate treats
//! "no data submitted" as vacuously valid.

use std::path::{Path, PathBuf};

/// Find every `.json` file at any depth under `repo_root.join(dir)`.
///
/// Results are sorted so that every run visits files in the same order.
/// An absolute `dir` is used as-is.
pub fn find_json_files(repo_root: &Path, dir: &Path) -> Vec<PathBuf> {
    let root = repo_root.join(dir);
    if !root.is_dir() {
        tracing::debug!(dir = %root.display(), "directory not found; nothing to validate");
        return Vec::new();
    }

    let mut results = Vec::new();
    walk_for_json(&root, &mut results);
    results.sort();
    results
}

fn walk_for_json(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during file walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_for_json(&path, acc);
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            acc.push(path);
        }
    }
}
