//! # Response Predicates
//!
//! Boolean checks over the matches of a query. None of them fail: a query
//! that does not parse behaves like a query that matches nothing, and each
//! predicate defines what an empty match set means.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use assay_core::{json_contains, json_equal, JsonKind};

use crate::eval::traverse_object;

/// Direction for [`is_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn admits(self, ordering: Ordering) -> bool {
        match self {
            Order::Asc => ordering != Ordering::Greater,
            Order::Desc => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        })
    }
}

/// Every match has one of `expected` kinds.
///
/// No match at all counts as finding `null`: the result is then `true`
/// exactly when `expected` contains [`JsonKind::Null`].
pub fn is_exists(json: &Value, query: &str, expected: &[JsonKind]) -> bool {
    let matches = traverse_object(json, query);
    if matches.is_empty() {
        return expected.contains(&JsonKind::Null);
    }
    matches
        .iter()
        .all(|value| expected.contains(&JsonKind::of(value)))
}

/// `expected` is among the matches.
pub fn is_equal(json: &Value, query: &str, expected: &Value) -> bool {
    json_contains(traverse_object(json, query), expected)
}

/// Hand the full match list to `predicate`.
pub fn is_equal_with<F>(json: &Value, query: &str, predicate: F) -> bool
where
    F: FnOnce(&[&Value]) -> bool,
{
    predicate(&traverse_object(json, query))
}

/// Adjacent matches are monotonic in `order`.
///
/// Only string/string and number/number neighbours compare; any other
/// pairing fails the check. Fewer than two matches are trivially ordered.
pub fn is_ordered(json: &Value, query: &str, order: Order) -> bool {
    monotonic(&traverse_object(json, query), order)
}

/// [`is_ordered`] after mapping every match through `convert`.
pub fn is_ordered_by<F>(json: &Value, query: &str, order: Order, convert: F) -> bool
where
    F: Fn(&Value) -> Value,
{
    let converted: Vec<Value> = traverse_object(json, query)
        .into_iter()
        .map(convert)
        .collect();
    monotonic(&converted, order)
}

fn monotonic<V: Borrow<Value>>(values: &[V], order: Order) -> bool {
    values.windows(2).all(|pair| {
        compare(pair[0].borrow(), pair[1].borrow()).is_some_and(|ordering| order.admits(ordering))
    })
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

/// Every match is a string containing `needle`, ignoring case.
///
/// An empty match set is `false`.
pub fn is_every_item_contain(json: &Value, query: &str, needle: &str) -> bool {
    let matches = traverse_object(json, query);
    if matches.is_empty() {
        return false;
    }
    let needle = needle.to_lowercase();
    matches.iter().all(|value| {
        value
            .as_str()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

/// No scalar reached in `first` equals any scalar reached in `second`.
///
/// Objects or arrays among the matches, or an empty match set on either
/// side, make the result `false`.
pub fn is_every_item_different(first: &Value, second: &Value, query: &str) -> bool {
    let left = traverse_object(first, query);
    let right = traverse_object(second, query);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    let scalar = |value: &&Value| JsonKind::of(value).is_scalar();
    if !left.iter().all(scalar) || !right.iter().all(scalar) {
        return false;
    }
    left.iter()
        .all(|a| right.iter().all(|b| !json_equal(a, b)))
}

/// The number of matches lies in `min..=max`.
pub fn is_total_data_in_range(json: &Value, query: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&traverse_object(json, query).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_exists_absence_counts_as_null() {
        assert!(is_exists(&Value::Null, "x", &[JsonKind::Null]));
        assert!(!is_exists(&json!({}), "missing", &[JsonKind::String]));
        assert!(is_exists(&json!({}), "missing", &[JsonKind::Null]));
    }

    #[test]
    fn test_is_exists_checks_every_match() {
        let body = json!({"items": [{"id": 1}, {"id": "2"}]});
        assert!(!is_exists(&body, "items[].id", &[JsonKind::Number]));
        assert!(is_exists(&body, "items[].id", &[JsonKind::Number, JsonKind::String]));
        assert!(is_exists(&json!({"a": null}), "a", &[JsonKind::String, JsonKind::Null]));
    }

    #[test]
    fn test_is_equal_is_membership() {
        let body = json!({"tags": [{"n": "a"}, {"n": "b"}]});
        assert!(is_equal(&body, "tags[].n", &json!("b")));
        assert!(!is_equal(&body, "tags[].n", &json!("c")));
        assert!(is_equal(&json!({"n": 1.0}), "n", &json!(1)));
    }

    #[test]
    fn test_is_equal_with_sees_all_matches() {
        let body = json!([{"p": 10}, {"p": 20}]);
        let total_is_30 = is_equal_with(&body, "[].p", |matches| {
            matches.iter().filter_map(|v| v.as_i64()).sum::<i64>() == 30
        });
        assert!(total_is_30);
        assert!(is_equal_with(&body, "[].missing", |matches| matches.is_empty()));
    }

    #[test]
    fn test_is_ordered() {
        let body = json!([{"v": 1}, {"v": 3}, {"v": 2}]);
        assert!(!is_ordered(&body, "[].v", Order::Asc));
        assert!(is_ordered(&json!([]), "[].v", Order::Asc));
        assert!(is_ordered(&json!([{"v": 5}]), "[].v", Order::Desc));
        assert!(is_ordered(&json!([{"v": 1}, {"v": 1}, {"v": 2}]), "[].v", Order::Asc));
        assert!(is_ordered(&json!([{"v": "c"}, {"v": "b"}, {"v": "a"}]), "[].v", Order::Desc));
    }

    #[test]
    fn test_is_ordered_mixed_kinds_fail() {
        assert!(!is_ordered(&json!([{"v": 1}, {"v": "2"}]), "[].v", Order::Asc));
        assert!(!is_ordered(&json!([{"v": null}, {"v": null}]), "[].v", Order::Asc));
    }

    #[test]
    fn test_is_ordered_by_conversion() {
        let body = json!([{"at": "9"}, {"at": "10"}, {"at": "11"}]);
        // Lexically "10" < "9"; numerically ascending.
        assert!(!is_ordered(&body, "[].at", Order::Asc));
        let numeric = |v: &Value| {
            v.as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map_or(Value::Null, Value::from)
        };
        assert!(is_ordered_by(&body, "[].at", Order::Asc, numeric));
    }

    #[test]
    fn test_is_every_item_contain() {
        let body = json!({"rows": [{"t": "Hello World"}, {"t": "world peace"}]});
        assert!(is_every_item_contain(&body, "rows[].t", "WORLD"));
        assert!(!is_every_item_contain(&body, "rows[].t", "hello"));
        assert!(!is_every_item_contain(&body, "rows[].missing", "x"));
        assert!(!is_every_item_contain(&json!({"t": 5}), "t", "5"));
    }

    #[test]
    fn test_is_every_item_different() {
        let page1 = json!({"data": [{"id": 1}, {"id": 2}]});
        let page2 = json!({"data": [{"id": 3}, {"id": 4}]});
        let overlap = json!({"data": [{"id": 2}, {"id": 5}]});
        assert!(is_every_item_different(&page1, &page2, "data[].id"));
        assert!(!is_every_item_different(&page1, &overlap, "data[].id"));
        assert!(!is_every_item_different(&page1, &json!({"data": []}), "data[].id"));
        assert!(!is_every_item_different(&page1, &page2, "data"));
    }

    #[test]
    fn test_is_every_item_different_treats_null_as_scalar() {
        let a = json!({"v": null});
        assert!(!is_every_item_different(&a, &a, "v"));
        assert!(is_every_item_different(&a, &json!({"v": 0}), "v"));
    }

    #[test]
    fn test_is_total_data_in_range() {
        let body = json!({"items": [1, 2, 3]});
        assert!(is_total_data_in_range(&body, "items[]", 1, 3));
        assert!(!is_total_data_in_range(&body, "items[]", 4, 10));
        assert!(is_total_data_in_range(&body, "missing[]", 0, 0));
        assert!(!is_total_data_in_range(&body, "items[]", 3, 2));
    }
}
