//! # assay-cli — Response Check Runner
//!
//! Provides the `assay` command-line interface over the schema validator
//! and the query/predicate library.
//!
//! ## Subcommands
//!
//! - `assay validate` — Validate JSON documents against a JSON Schema.
//! - `assay query` — Print the values a path query reaches.
//! - `assay check` — Run a YAML check suite against a response body.
//!
//! ```bash
//! assay validate --schema schemas/user.schema.json responses/user-42.json
//! assay query 'data[].id' responses/users.json
//! assay check --checks suites/users.yaml responses/users.json
//! ```
//!
//! ## Exit Codes
//!
//! `0` when everything passed, `1` when a document or check failed, `2` on
//! an operational error (unreadable file, malformed schema or suite).

pub mod check;
pub mod config;
pub mod query;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is. A relative path is joined onto
/// `base` when that file exists, otherwise it is left relative to the
/// current directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let based = base.join(path);
    if based.exists() {
        based
    } else {
        path.to_path_buf()
    }
}

/// Read and parse a JSON document from disk.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_absolute_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("x.json");
        assert_eq!(resolve_path(&abs, Path::new("/elsewhere")), abs);
    }

    #[test]
    fn resolve_path_prefers_existing_base_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.json"), "{}").unwrap();
        assert_eq!(
            resolve_path(Path::new("schema.json"), dir.path()),
            dir.path().join("schema.json")
        );
        assert_eq!(
            resolve_path(Path::new("missing.json"), dir.path()),
            PathBuf::from("missing.json")
        );
    }

    #[test]
    fn read_json_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));

        assert!(read_json(&dir.path().join("absent.json")).is_err());
    }
}
