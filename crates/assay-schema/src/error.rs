//! # Schema Errors
//!
//! Schema-authoring defects (unparsable text, dangling or looping `$ref`)
//! are broken fixtures and surface as `Err` from compilation. Data defects
//! never do: they are accumulated into a
//! [`ValidationResult`](crate::ValidationResult), which a caller may turn
//! into [`SchemaError::ValidationFailed`] to fail an assertion with `?`.

use thiserror::Error;

use assay_core::AssayError;

use crate::validate::ValidationResult;

/// Error during schema compilation, or an explicitly rejected document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("schema text is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A `$ref` pointer walks off the root document.
    #[error("unresolved $ref '{reference}': segment '{segment}' not found")]
    UnresolvedReference {
        /// The full `$ref` string.
        reference: String,
        /// The first pointer segment that could not be found.
        segment: String,
    },

    /// A `$ref` chain returns to a pointer it already visited.
    #[error("$ref cycle: {}", .chain.join(" -> "))]
    ReferenceCycle {
        /// The pointers visited, ending with the repeated one.
        chain: Vec<String>,
    },

    /// A document did not conform to the schema.
    #[error("validation failed:\n{0}")]
    ValidationFailed(ValidationResult),
}

impl From<SchemaError> for AssayError {
    fn from(err: SchemaError) -> Self {
        AssayError::Schema(err.to_string())
    }
}
