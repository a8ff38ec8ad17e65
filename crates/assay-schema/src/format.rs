//! # String Formats
//!
//! The `format` vocabulary recognized by the validator. Checks are
//! deliberately lenient where the payloads under test are lenient:
//!
//! - `email` — a conservative `local@domain.tld` shape, no RFC 5322 parsing.
//! - `uri` — anything `url::Url` parses as an absolute URL.
//! - `date` / `date-time` — anything that parses as a calendar date, an
//!   RFC 3339 timestamp, or a naive ISO 8601 timestamp.
//!
//! Unknown format names are not checked.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex constant"));

/// A recognized `format` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Uri,
    Date,
    DateTime,
}

impl Format {
    /// Look up a format by its schema name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(Format::Email),
            "uri" => Some(Format::Uri),
            "date" => Some(Format::Date),
            "date-time" => Some(Format::DateTime),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Date => "date",
            Format::DateTime => "date-time",
        }
    }

    pub fn is_valid(&self, text: &str) -> bool {
        match self {
            Format::Email => EMAIL_RE.is_match(text),
            Format::Uri => url::Url::parse(text).is_ok(),
            Format::Date | Format::DateTime => parses_as_date(text),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check `text` against a named format. `None` for unknown names.
pub fn check_format(name: &str, text: &str) -> Option<bool> {
    Format::from_name(name).map(|format| format.is_valid(text))
}

fn parses_as_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}
