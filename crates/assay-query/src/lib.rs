//! # assay-query — Path Queries and Response Predicates
//!
//! A small path language for pulling values out of JSON response bodies,
//! and the boolean predicates response checks are written with.
//!
//! ```
//! use assay_query::{traverse_object, is_ordered, Order};
//! use serde_json::json;
//!
//! let body = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
//! assert_eq!(traverse_object(&body, "a.b[].c"), vec![&json!(1), &json!(2)]);
//! assert!(is_ordered(&body, "a.b[].c", Order::Asc));
//! ```
//!
//! ## Crate Policy
//!
//! - Queries and predicates never return `Err` and never panic. A query
//!   that does not parse matches nothing.
//! - [`QueryPath::parse`] is the one fallible entry point, for callers
//!   that want to reject a malformed query up front.

pub mod check;
pub mod eval;
pub mod predicate;
pub mod token;

pub use check::{run_checks, Check, CheckOutcome};
pub use eval::{traverse_object, QueryPath};
pub use predicate::{
    is_equal, is_equal_with, is_every_item_contain, is_every_item_different, is_exists,
    is_ordered, is_ordered_by, is_total_data_in_range, Order,
};
pub use token::{tokenize, QueryError, Token};
