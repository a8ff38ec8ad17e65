//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across assay crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema-authoring errors (broken fixtures) are returned as `Err` and are
//!   meant to abort the caller loudly.
//! - Data-validation failures are values, not errors: they only become an
//!   `AssayError` when a caller explicitly converts a failed result.
//! - Query faults never escape the predicate library; `Query` exists for
//!   callers that parse query strings up front.

use thiserror::Error;

/// Top-level error type for assay.
#[derive(Error, Debug)]
pub enum AssayError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A JSON kind name was not recognized.
    #[error("unknown JSON kind: {0:?}")]
    UnknownKind(String),

    /// Schema compilation or validation failure.
    #[error("schema error: {0}")]
    Schema(String),

    /// A query string could not be parsed.
    #[error("query error: {0}")]
    Query(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JCS serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
