//! # JSON Kinds
//!
//! The runtime type taxonomy used by type errors and predicates. Unlike a
//! loosely typed runtime, arrays and `null` are first-class kinds here and
//! never collapse into `object`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AssayError;

/// Runtime kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonKind {
    /// All kinds, in declaration order.
    pub const ALL: [JsonKind; 6] = [
        JsonKind::String,
        JsonKind::Number,
        JsonKind::Boolean,
        JsonKind::Object,
        JsonKind::Array,
        JsonKind::Null,
    ];

    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    /// Lowercase name as used in schemas and predicate arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Boolean => "boolean",
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::Null => "null",
        }
    }

    /// Returns true for kinds that hold no nested values.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonKind::Object | JsonKind::Array)
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonKind {
    type Err = AssayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AssayError::UnknownKind(s.to_string()))
    }
}
