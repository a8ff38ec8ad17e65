//! # assay-core — Foundational JSON Primitives
//!
//! This crate holds the small set of JSON-level building blocks shared by
//! the schema validator (`assay-schema`) and the path query engine
//! (`assay-query`). It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One kind model.** `JsonKind` is the single runtime type taxonomy
//!    (`string|number|boolean|object|array|null`). Type errors, `isExists`
//!    checks and ordering checks all name kinds through it, so `array` and
//!    `null` are never reported as a generic `object`.
//!
//! 2. **Numeric-aware equality.** `json_equal()` compares numbers by value,
//!    so `1` and `1.0` are equal for `enum`, `const` and predicate
//!    membership even though `serde_json` stores them differently.
//!
//! 3. **`CanonicalText` newtype.** Structural identity of JSON values (used
//!    by `uniqueItems`) flows through `CanonicalText::new()`: sorted keys,
//!    compact separators, RFC 8785 number formatting.
//!
//! 4. **Diagnostic paths.** Instance paths use dot/`[index]` notation and
//!    schema paths are slash delimited from `#`; both are built only through
//!    the helpers in [`path`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `assay-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod equality;
pub mod error;
pub mod kind;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalText;
pub use equality::{json_equal, json_contains};
pub use error::{AssayError, CanonicalizationError};
pub use kind::JsonKind;
