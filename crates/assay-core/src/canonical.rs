//! # Canonical Text — JCS-Compatible Value Identity
//!
//! This module defines `CanonicalText`, the sole construction path for the
//! string form used when two JSON values must be compared as *the same
//! document* (for example `uniqueItems`).
//!
//! ## Invariant
//!
//! The `CanonicalText` newtype has a private inner field. The only way to
//! construct it is through `CanonicalText::new()`, which serializes with
//! `serde_jcs` (RFC 8785): sorted keys, compact separators, and ECMAScript
//! number formatting. Two values that differ only in key order or in the
//! representation of an integral number (`1` vs `1.0`) produce identical
//! text.

use serde_json::Value;

use crate::error::CanonicalizationError;

/// Canonical text of a JSON value.
///
/// # Invariants
///
/// - The only constructor is `CanonicalText::new()`.
/// - Object keys are sorted; separators are compact.
/// - Numbers use the shortest ECMAScript representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// Canonicalize a value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if JCS
    /// serialization fails.
    pub fn new(value: &Value) -> Result<Self, CanonicalizationError> {
        Ok(Self(serde_jcs::to_string(value)?))
    }

    /// Canonicalize a value, falling back to plain `serde_json` text.
    ///
    /// Used on validation paths, which must never fail.
    pub fn new_lossy(value: &Value) -> Self {
        Self::new(value).unwrap_or_else(|_| Self(value.to_string()))
    }

    /// Access the canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
