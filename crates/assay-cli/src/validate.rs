//! # Validate Subcommand
//!
//! Validates one or more JSON documents against a single JSON Schema and
//! prints every violation found in each.
//!
//! A schema that fails to compile (bad JSON, dangling `$ref`, reference
//! cycle) is an operational error. A document that cannot be read is
//! reported and the remaining documents are still validated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use assay_schema::CompiledSchema;

use crate::config::AssayConfig;

/// Arguments for the `assay validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON Schema file to validate against.
    #[arg(long, short, value_name = "FILE")]
    pub schema: PathBuf,

    /// JSON documents to validate.
    #[arg(value_name = "DOC", required = true)]
    pub documents: Vec<PathBuf>,
}

/// Load and compile a schema file.
pub fn load_schema(path: &Path, config: &AssayConfig) -> Result<CompiledSchema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let schema = CompiledSchema::compile_with(&text, config.validator)
        .with_context(|| format!("failed to compile schema {}", path.display()))?;
    tracing::info!(
        schema = %path.display(),
        definitions = schema.context().definitions().len(),
        references = schema.context().reference_count(),
        "compiled schema"
    );
    Ok(schema)
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every document is valid, 1 when any document
/// has violations, 2 when any document could not be read.
pub fn run_validate(args: &ValidateArgs, config: &AssayConfig) -> Result<u8> {
    let schema = load_schema(&args.schema, config)?;

    let mut invalid = 0usize;
    let mut unreadable = 0usize;

    for path in &args.documents {
        match validate_document(&schema, path) {
            Ok(true) => {}
            Ok(false) => invalid += 1,
            Err(e) => {
                println!("ERROR: {e:#}");
                unreadable += 1;
            }
        }
    }

    let total = args.documents.len();
    println!(
        "\nDocuments: {}/{} valid",
        total - invalid - unreadable,
        total
    );

    Ok(if unreadable > 0 {
        2
    } else if invalid > 0 {
        1
    } else {
        0
    })
}

/// Validate one document, printing its result. Returns whether it is valid.
fn validate_document(schema: &CompiledSchema, path: &Path) -> Result<bool> {
    let document = crate::read_json(path)?;
    let result = schema.validate(&document);

    if result.valid {
        println!("OK: {}", path.display());
    } else {
        println!(
            "FAIL: {} ({} violation{})",
            path.display(),
            result.len(),
            if result.len() == 1 { "" } else { "s" }
        );
        println!("{result}");
    }
    Ok(result.valid)
}
