//! # assay-schema — JSON Schema Validation
//!
//! A self-contained JSON Schema validator for HTTP response checks. No
//! third-party schema engine is involved: schema text is parsed into typed
//! [`SchemaNode`]s, `$ref` pointers are resolved against the root document,
//! and values are checked by a recursive walker that reports every
//! violation it finds.
//!
//! ## Usage
//!
//! ```
//! use assay_schema::CompiledSchema;
//! use serde_json::json;
//!
//! let schema = CompiledSchema::compile(
//!     r#"{"type": "object", "required": ["email"],
//!         "properties": {"email": {"type": "string", "format": "email"}}}"#,
//! )?;
//!
//! let result = schema.validate(&json!({"email": "not-an-email"}));
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].path, "email");
//! assert!(result.errors[0].schema_path.ends_with("/format"));
//! # Ok::<(), assay_schema::SchemaError>(())
//! ```
//!
//! ## Modules
//!
//! - [`node`] — the typed keyword model.
//! - [`resolve`] — `$ref` pointer walking and the [`ValidationContext`].
//! - [`validate`] — [`CompiledSchema`], results and the recursive walker.
//! - [`format`] — `email`, `uri`, `date`, `date-time`.
//!
//! ## Crate Policy
//!
//! - Depends only on `assay-core` internally.
//! - Malformed schema *input* is an `Err` at compile time; malformed *data*
//!   is never an `Err`, only entries in a [`ValidationResult`].
//! - A compiled schema is immutable and `Send + Sync`.

mod checks;
pub mod error;
pub mod format;
pub mod node;
pub mod resolve;
pub mod validate;

use serde_json::Value;

pub use error::SchemaError;
pub use format::Format;
pub use node::{Keyword, SchemaNode, TypeName};
pub use resolve::ValidationContext;
pub use validate::{CompiledSchema, ValidationError, ValidationResult, ValidatorOptions};

/// Compile schema text into a reusable validation closure.
///
/// # Errors
///
/// Returns the compilation errors of [`CompiledSchema::compile`].
pub fn compile(text: &str) -> Result<impl Fn(&Value) -> ValidationResult + Send + Sync, SchemaError> {
    let schema = CompiledSchema::compile(text)?;
    Ok(move |value: &Value| schema.validate(value))
}
