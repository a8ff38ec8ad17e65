//! # Query Tokenizer
//!
//! Grammar:
//!
//! ```text
//! Query   := Segment ("." Segment)*
//! Segment := Key | Key "[]" | "[]"
//! ```
//!
//! A bare `[]` is only legal as the first segment, where it flattens a root
//! array. Keys may contain any character except `.`, `[` and `]`.

use thiserror::Error;

use assay_core::AssayError;

/// One step of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `key`: property lookup.
    Key(String),
    /// `key[]`: property lookup, then splice the array's elements.
    FlattenKey(String),
    /// `[]`: splice the elements of the root array.
    Flatten,
}

/// A query string that does not fit the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("empty segment {index} in query {query:?}")]
    EmptySegment { query: String, index: usize },

    #[error("bare [] is only allowed as the first segment (segment {index} in {query:?})")]
    MisplacedFlatten { query: String, index: usize },

    #[error("unexpected bracket in segment {segment:?} of query {query:?}")]
    StrayBracket { query: String, segment: String },
}

impl From<QueryError> for AssayError {
    fn from(err: QueryError) -> Self {
        AssayError::Query(err.to_string())
    }
}

/// Split a query into tokens.
///
/// # Errors
///
/// Returns a `QueryError` describing the first segment that does not fit
/// the grammar.
pub fn tokenize(query: &str) -> Result<Vec<Token>, QueryError> {
    if query.is_empty() {
        return Err(QueryError::Empty);
    }

    query
        .split('.')
        .enumerate()
        .map(|(index, segment)| tokenize_segment(query, index, segment))
        .collect()
}

fn tokenize_segment(query: &str, index: usize, segment: &str) -> Result<Token, QueryError> {
    if segment == "[]" {
        return if index == 0 {
            Ok(Token::Flatten)
        } else {
            Err(QueryError::MisplacedFlatten {
                query: query.to_string(),
                index,
            })
        };
    }

    let (key, flatten) = match segment.strip_suffix("[]") {
        Some(key) => (key, true),
        None => (segment, false),
    };

    if key.is_empty() {
        return Err(QueryError::EmptySegment {
            query: query.to_string(),
            index,
        });
    }
    if key.contains(['[', ']']) {
        return Err(QueryError::StrayBracket {
            query: query.to_string(),
            segment: segment.to_string(),
        });
    }

    Ok(if flatten {
        Token::FlattenKey(key.to_string())
    } else {
        Token::Key(key.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Token {
        Token::Key(k.to_string())
    }

    fn flat(k: &str) -> Token {
        Token::FlattenKey(k.to_string())
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(tokenize("a.b.c").unwrap(), vec![key("a"), key("b"), key("c")]);
    }

    #[test]
    fn test_flatten_key() {
        assert_eq!(tokenize("a.b[].c").unwrap(), vec![key("a"), flat("b"), key("c")]);
    }

    #[test]
    fn test_root_flatten() {
        assert_eq!(tokenize("[]").unwrap(), vec![Token::Flatten]);
        assert_eq!(tokenize("[].v").unwrap(), vec![Token::Flatten, key("v")]);
    }

    #[test]
    fn test_bare_flatten_after_first_segment_rejected() {
        assert_eq!(
            tokenize("a.[]"),
            Err(QueryError::MisplacedFlatten {
                query: "a.[]".to_string(),
                index: 1
            })
        );
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert_eq!(tokenize(""), Err(QueryError::Empty));
        assert!(matches!(tokenize("a..b"), Err(QueryError::EmptySegment { index: 1, .. })));
        assert!(matches!(tokenize("a."), Err(QueryError::EmptySegment { index: 1, .. })));
    }

    #[test]
    fn test_stray_brackets_rejected() {
        assert!(matches!(tokenize("a[0]"), Err(QueryError::StrayBracket { .. })));
        assert!(matches!(tokenize("a[]b"), Err(QueryError::StrayBracket { .. })));
        assert!(matches!(tokenize("a[][]"), Err(QueryError::StrayBracket { .. })));
    }

    #[test]
    fn test_keys_keep_other_characters() {
        assert_eq!(tokenize("x-trace id").unwrap(), vec![key("x-trace id")]);
    }
}
