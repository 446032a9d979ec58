//! Compiled, backend-specific query specifications.
//!
//! A [`CompiledQuery`] is the engine's end product: a fully resolved
//! specification ready to hand to the external `QueryExecutor`. It is
//! built at most once per grid instance unless explicitly invalidated.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::filter::BindValue;
use crate::types::pagination::PageBounds;
use crate::types::params::ParamValue;

/// The relational compilation result: WHERE template + ordered binds,
/// ORDER BY SQL, join/include/group passthrough, and pagination bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationalQuery {
    /// AND-combined WHERE clause with positional `?` placeholders,
    /// `None` when no conditions apply.
    pub where_sql: Option<String>,
    /// Bound values in placeholder order.
    pub binds: Vec<BindValue>,
    /// Fully assembled ORDER BY expression (already quoted / templated).
    pub order_sql: Option<String>,
    /// JOIN clauses passed through from the grid declaration.
    pub joins: Vec<String>,
    /// Eager-load associations passed through from the grid declaration.
    pub includes: Vec<String>,
    /// GROUP BY expression passed through from the grid declaration.
    pub group: Option<String>,
    /// Pagination bounds.
    pub bounds: PageBounds,
}

/// How a search-index query orders its results. The two forms are
/// mutually exclusive per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOrder {
    /// Structured sort on an index attribute.
    Field {
        /// Index attribute name (qualified column dots become underscores).
        column: String,
        /// Sort mode: the requested direction when one was given, otherwise
        /// the grid's configured sort mode.
        mode: String,
    },
    /// A raw sort expression handed to the index verbatim.
    RawSql(String),
}

/// An attribute filter on the search index's "with" map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WithFilter {
    /// A single attribute value.
    Scalar(String),
    /// An inclusive numeric range.
    NumericRange(f64, f64),
    /// An inclusive time range (the upper bound has already been advanced
    /// by one day to make a date-typed upper bound inclusive).
    TimeRange(NaiveDateTime, NaiveDateTime),
}

/// The search-index compilation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query string.
    pub search_text: Option<String>,
    /// Result ordering, when requested.
    pub order: Option<SearchOrder>,
    /// Attribute filters routed to the index's "with" map.
    pub with_filters: BTreeMap<String, WithFilter>,
    /// Filter values whose keys match configured index fields; these are
    /// routed into the baseline query conditions instead of "with".
    pub conditions: BTreeMap<String, ParamValue>,
    /// Index names to search.
    pub index_names: Vec<String>,
    /// Per-index weight overrides.
    pub index_weights: BTreeMap<String, u32>,
    /// Match mode passed through to the index.
    pub match_mode: Option<String>,
    /// Pagination bounds.
    pub bounds: PageBounds,
}

/// A fully resolved, backend-specific query specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompiledQuery {
    /// Compiled for a relational engine.
    Relational(RelationalQuery),
    /// Compiled for a full-text search index.
    Search(SearchQuery),
}

impl CompiledQuery {
    /// The relational form, if this query was compiled for one.
    pub fn as_relational(&self) -> Option<&RelationalQuery> {
        match self {
            Self::Relational(q) => Some(q),
            Self::Search(_) => None,
        }
    }

    /// The search form, if this query was compiled for one.
    pub fn as_search(&self) -> Option<&SearchQuery> {
        match self {
            Self::Search(q) => Some(q),
            Self::Relational(_) => None,
        }
    }
}
