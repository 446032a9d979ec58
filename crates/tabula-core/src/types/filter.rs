//! Filter values, condition fragments, and bound scalars.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::params::ParamValue;

/// Per-grid filter status: filter key (bare or qualified column name) to
/// raw request value. Keys are unique; insertion order is irrelevant.
pub type FilterStatus = BTreeMap<String, ParamValue>;

/// A parsed calendar instant used as a temporal range bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instant {
    /// A plain date.
    Date(NaiveDate),
    /// A date with a time-of-day.
    DateTime(NaiveDateTime),
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// One end of a range filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    /// A raw string bound (numeric filters keep these as typed by the
    /// user; they are bound verbatim after the digit guard).
    Raw(String),
    /// A parsed instant (temporal filters).
    Instant(Instant),
}

/// The binder-normalized filter value handed to a condition generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterInput {
    /// A scalar string.
    Scalar(String),
    /// A multi-select value list.
    Many(Vec<String>),
    /// A free-text filter with an optional negation flag (`{v, n}`).
    Text {
        /// The text fragment to match.
        value: String,
        /// Whether the match is negated (`n == "1"`).
        negated: bool,
    },
    /// A range filter (`{fr, to}`); either end may be absent.
    Range {
        /// Lower bound, inclusive.
        from: Option<Bound>,
        /// Upper bound, inclusive.
        to: Option<Bound>,
    },
}

/// A positional bound scalar in a compiled condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindValue {
    /// A boolean bind.
    Bool(bool),
    /// A string bind (LIKE patterns, numeric bounds, IN members).
    Str(String),
    /// A date bind.
    Date(NaiveDate),
    /// A datetime bind.
    DateTime(NaiveDateTime),
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<Instant> for BindValue {
    fn from(instant: Instant) -> Self {
        match instant {
            Instant::Date(d) => Self::Date(d),
            Instant::DateTime(dt) => Self::DateTime(dt),
        }
    }
}

/// A composable unit of query logic: an SQL template with positional `?`
/// placeholders plus its ordered bound values.
///
/// Fragments compose conjunctively across columns; a single fragment may
/// itself encode an internal OR. Generators return `Option<Condition>`,
/// where `None` means "no condition" and causes the corresponding filter
/// key to be pruned from status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// SQL template with `?` placeholders.
    pub sql: String,
    /// Bound values, in placeholder order.
    pub binds: Vec<BindValue>,
}

impl Condition {
    /// Create a condition from a template and its binds.
    pub fn new(sql: impl Into<String>, binds: Vec<BindValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// Create a bind-free condition (raw SQL, e.g. `IS NULL` checks).
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}
