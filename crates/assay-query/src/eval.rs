//! # Query Evaluation
//!
//! A query is evaluated against a working list that starts as `[root]`.
//! Each token maps the list to a new one:
//!
//! - `Key(k)` keeps `v[k]` for every object `v` that has `k`.
//! - `FlattenKey(k)` splices the elements of `v[k]` for every object `v`
//!   whose `k` is an array.
//! - `Flatten` splices the elements of every array in the list.
//!
//! Values that do not fit a step drop out silently. A present `null` is a
//! value and is retained.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::token::{tokenize, QueryError, Token};

/// A parsed query, reusable across documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath {
    source: String,
    tokens: Vec<Token>,
}

impl QueryPath {
    /// Parse a query string.
    ///
    /// # Errors
    ///
    /// Returns a `QueryError` if the query does not fit the grammar.
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        Ok(Self {
            source: query.to_string(),
            tokens: tokenize(query)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every value the query reaches in `root`, in document order.
    pub fn evaluate<'v>(&self, root: &'v Value) -> Vec<&'v Value> {
        let mut working = vec![root];
        for token in &self.tokens {
            if working.is_empty() {
                break;
            }
            working = step(&working, token);
        }
        working
    }
}

fn step<'v>(working: &[&'v Value], token: &Token) -> Vec<&'v Value> {
    let mut next = Vec::with_capacity(working.len());
    for value in working {
        match token {
            Token::Key(key) => {
                if let Some(child) = value.as_object().and_then(|map| map.get(key)) {
                    next.push(child);
                }
            }
            Token::FlattenKey(key) => {
                if let Some(Value::Array(items)) = value.as_object().and_then(|map| map.get(key)) {
                    next.extend(items.iter());
                }
            }
            Token::Flatten => {
                if let Value::Array(items) = value {
                    next.extend(items.iter());
                }
            }
        }
    }
    next
}

impl FromStr for QueryPath {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Evaluate `query` against `root`.
///
/// Never fails: a query that does not parse yields an empty list and a
/// debug-level log line.
pub fn traverse_object<'v>(root: &'v Value, query: &str) -> Vec<&'v Value> {
    match QueryPath::parse(query) {
        Ok(path) => path.evaluate(root),
        Err(err) => {
            tracing::debug!(query, error = %err, "query did not parse, treating as no matches");
            Vec::new()
        }
    }
}
