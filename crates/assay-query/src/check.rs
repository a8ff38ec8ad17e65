//! # Declarative Checks
//!
//! A [`Check`] names one predicate and its arguments so that response
//! assertions can live in data files next to the schemas they accompany:
//!
//! ```yaml
//! - kind: exists
//!   query: data[].id
//!   types: [number]
//! - kind: ordered
//!   query: data[].createdAt
//!   order: desc
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use assay_core::JsonKind;

use crate::predicate::{
    is_equal, is_every_item_contain, is_every_item_different, is_exists, is_ordered,
    is_total_data_in_range, Order,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    Exists {
        query: String,
        types: Vec<JsonKind>,
    },
    Equal {
        query: String,
        expected: Value,
    },
    Ordered {
        query: String,
        order: Order,
    },
    EveryItemContains {
        query: String,
        substring: String,
    },
    EveryItemDifferent {
        query: String,
        other: Value,
    },
    TotalInRange {
        query: String,
        min: usize,
        max: usize,
    },
}

impl Check {
    pub fn query(&self) -> &str {
        match self {
            Check::Exists { query, .. }
            | Check::Equal { query, .. }
            | Check::Ordered { query, .. }
            | Check::EveryItemContains { query, .. }
            | Check::EveryItemDifferent { query, .. }
            | Check::TotalInRange { query, .. } => query,
        }
    }

    /// Run the predicate against a response body.
    pub fn evaluate(&self, body: &Value) -> bool {
        match self {
            Check::Exists { query, types } => is_exists(body, query, types),
            Check::Equal { query, expected } => is_equal(body, query, expected),
            Check::Ordered { query, order } => is_ordered(body, query, *order),
            Check::EveryItemContains { query, substring } => {
                is_every_item_contain(body, query, substring)
            }
            Check::EveryItemDifferent { query, other } => {
                is_every_item_different(body, other, query)
            }
            Check::TotalInRange { query, min, max } => {
                is_total_data_in_range(body, query, *min, *max)
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Exists { query, types } => {
                let names: Vec<&str> = types.iter().map(JsonKind::as_str).collect();
                write!(f, "{query} exists as {}", names.join(" | "))
            }
            Check::Equal { query, expected } => write!(f, "{query} includes {expected}"),
            Check::Ordered { query, order } => write!(f, "{query} is ordered {order}"),
            Check::EveryItemContains { query, substring } => {
                write!(f, "every {query} contains {substring:?}")
            }
            Check::EveryItemDifferent { query, .. } => {
                write!(f, "every {query} differs from the other document")
            }
            Check::TotalInRange { query, min, max } => {
                write!(f, "{query} has between {min} and {max} matches")
            }
        }
    }
}

/// The result of one [`Check`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub passed: bool,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{status}  {}", self.check)
    }
}

/// Evaluate every check against `body`, in order. One failing check does
/// not stop the rest.
pub fn run_checks(body: &Value, checks: &[Check]) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|check| {
            let passed = check.evaluate(body);
            tracing::debug!(check = %check, passed, "check evaluated");
            CheckOutcome {
                check: check.clone(),
                passed,
            }
        })
        .collect()
}
