//! # Deep Equality
//!
//! `serde_json::Value`'s `PartialEq` distinguishes `1` from `1.0` because
//! the two are stored as different `Number` representations. Assertions on
//! HTTP payloads care about the numeric value only, so every equality test
//! in assay (`enum`, `const`, `isEqual`, `isEveryItemDifferent`) goes
//! through [`json_equal`].

use serde_json::{Number, Value};

/// Structural equality with numbers compared by value.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_equal(v, other)))
        }
        _ => false,
    }
}

/// Returns true if any element of `haystack` is [`json_equal`] to `needle`.
pub fn json_contains<'a, I>(haystack: I, needle: &Value) -> bool
where
    I: IntoIterator<Item = &'a Value>,
{
    haystack.into_iter().any(|v| json_equal(v, needle))
}

fn number_equal(x: &Number, y: &Number) -> bool {
    // Integers compare exactly; anything involving a float compares as f64.
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
