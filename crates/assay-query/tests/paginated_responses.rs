//! Integration test: response checks over paginated list endpoints, with
//! the check list loaded from YAML the way suite files carry it.

use assay_core::JsonKind;
use assay_query::{
    is_every_item_different, is_exists, is_ordered, is_total_data_in_range, run_checks,
    traverse_object, Check, Order, QueryPath,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn page(ids: &[i64]) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("Post #{id}"), "author": {"id": id % 3}}))
        .collect();
    json!({"data": data, "meta": {"page": 1, "perPage": ids.len()}})
}

#[test]
fn test_pages_do_not_overlap() {
    let first = page(&[10, 9, 8]);
    let second = page(&[7, 6, 5]);
    assert!(is_every_item_different(&first, &second, "data[].id"));
    assert!(is_ordered(&first, "data[].id", Order::Desc));
    assert!(is_total_data_in_range(&first, "data[]", 1, 3));
    assert!(is_exists(&first, "data[].author.id", &[JsonKind::Number]));
    assert!(is_exists(&first, "meta.next", &[JsonKind::String, JsonKind::Null]));
}

#[test]
fn test_yaml_suite_runs_in_order() {
    let suite = r#"
- kind: exists
  query: data[].title
  types: [string]
- kind: every_item_contains
  query: data[].title
  substring: "post #"
- kind: ordered
  query: data[].id
  order: asc
- kind: every_item_different
  query: data[].id
  other:
    data:
      - id: 1
"#;
    let checks: Vec<Check> = serde_yaml::from_str(suite).unwrap();
    let outcomes = run_checks(&page(&[3, 2]), &checks);
    let passed: Vec<bool> = outcomes.iter().map(|o| o.passed).collect();
    assert_eq!(passed, vec![true, true, false, true]);
}

proptest! {
    /// `key[]` yields exactly one value per array element that has the key.
    #[test]
    fn flatten_preserves_count_and_order(ids in prop::collection::vec(any::<i64>(), 0..20)) {
        let body = page(&ids);
        let found: Vec<i64> = traverse_object(&body, "data[].id")
            .into_iter()
            .filter_map(Value::as_i64)
            .collect();
        prop_assert_eq!(found, ids);
    }

    /// Sorting the ids always satisfies the matching order check.
    #[test]
    fn sorted_ids_are_ordered(mut ids in prop::collection::vec(-1000i64..1000, 0..20)) {
        ids.sort_unstable();
        prop_assert!(is_ordered(&page(&ids), "data[].id", Order::Asc));
        ids.reverse();
        prop_assert!(is_ordered(&page(&ids), "data[].id", Order::Desc));
    }

    /// Any dotted path of plain keys parses and round-trips through Display.
    #[test]
    fn plain_key_paths_parse(keys in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_-]{0,8}", 1..5)) {
        let query = keys.join(".");
        let path = QueryPath::parse(&query).unwrap();
        prop_assert_eq!(path.tokens().len(), keys.len());
        prop_assert_eq!(path.to_string(), query);
    }
}
