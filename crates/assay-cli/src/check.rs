//! # Check Subcommand
//!
//! Runs a YAML check suite against one response body:
//!
//! ```yaml
//! schema: user-list.schema.json   # optional, relative to this file
//! checks:
//!   - kind: total_in_range
//!     query: data[]
//!     min: 1
//!     max: 20
//!   - kind: ordered
//!     query: data[].id
//!     order: asc
//! ```
//!
//! The schema (when present) is validated first, then every check runs
//! regardless of earlier failures.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use assay_query::{run_checks, Check};

use crate::config::AssayConfig;
use crate::validate::load_schema;

/// Arguments for the `assay check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// YAML check suite.
    #[arg(long, value_name = "FILE")]
    pub checks: PathBuf,

    /// JSON response body to check.
    #[arg(value_name = "DOC")]
    pub document: PathBuf,
}

/// A check suite as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckSuite {
    pub schema: Option<PathBuf>,
    pub checks: Vec<Check>,
}

impl CheckSuite {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read check suite {}", path.display()))?;
        let suite: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid check suite {}", path.display()))?;
        Ok(suite)
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the schema and every check pass, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &AssayConfig) -> Result<u8> {
    let suite = CheckSuite::load(&args.checks)?;
    let body = crate::read_json(&args.document)?;

    tracing::info!(
        suite = %args.checks.display(),
        checks = suite.checks.len(),
        schema = suite.schema.is_some(),
        "running check suite"
    );

    let mut total = 0usize;
    let mut passed = 0usize;

    if let Some(ref schema_path) = suite.schema {
        let base = args.checks.parent().unwrap_or(Path::new("."));
        let resolved = crate::resolve_path(schema_path, base);
        let schema = load_schema(&resolved, config)?;
        let result = schema.validate(&body);

        total += 1;
        if result.valid {
            passed += 1;
            println!("PASS  matches schema {}", schema_path.display());
        } else {
            println!("FAIL  matches schema {}", schema_path.display());
            println!("{result}");
        }
    }

    for outcome in run_checks(&body, &suite.checks) {
        total += 1;
        if outcome.passed {
            passed += 1;
        }
        println!("{outcome}");
    }

    println!("\nChecks: {passed}/{total} passed");
    Ok(if passed == total { 0 } else { 1 })
}
