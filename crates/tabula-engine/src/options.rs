//! Typed grid construction options.
//!
//! The options are an explicit struct with named, typed fields and an
//! explicit validation pass; unknown option keys and wrongly-typed values
//! are unrepresentable by construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tabula_core::config::GridConfig;
use tabula_core::types::{Condition, OrderDirection, WithFilter};
use tabula_core::{GridError, GridResult};

/// What the compiled query is for: an HTML page or a CSV export. CSV
/// exports skip pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Regular paginated output.
    #[default]
    None,
    /// Unpaginated CSV export.
    Csv,
}

/// A custom ORDER BY hook for one column: either a template with `?`
/// standing for the qualified column name, or a callable producing the
/// SQL from it.
#[derive(Clone)]
pub enum CustomOrder {
    /// `"LENGTH(?)"`-style template; every `?` is replaced by the
    /// qualified column name.
    Template(String),
    /// A function from the qualified column name to the order SQL.
    Callable(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl fmt::Debug for CustomOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Callable(_) => f.debug_tuple("Callable").field(&"<fn>").finish(),
        }
    }
}

/// Per-compilation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Leave ORDER BY out (count queries).
    pub skip_ordering: bool,
    /// Recompute even if a compiled query is memoized, without re-arming
    /// the memo.
    pub forget_generated: bool,
}

/// Options enabling and configuring the search-index backend. Their
/// presence selects the backend for the grid's whole lifetime.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Free-text query.
    pub search_text: Option<String>,
    /// Index match mode passthrough.
    pub match_mode: Option<String>,
    /// Configured sort mode, used when the request names no direction.
    pub sort_mode: Option<String>,
    /// Index field names; filter keys matching one are routed into query
    /// conditions instead of "with" attribute filters.
    pub index_names: Vec<String>,
    /// Per-index weights.
    pub index_weights: BTreeMap<String, u32>,
    /// Baseline "with" attribute filters; these win over filters derived
    /// from request parameters.
    pub with: BTreeMap<String, WithFilter>,
}

/// Validated grid construction options.
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    /// Grid name: the request-parameter prefix. Alphanumeric/underscore.
    pub name: String,
    /// Default order column reference (bare or `table.column`).
    pub order: Option<String>,
    /// Default order direction.
    pub order_direction: OrderDirection,
    /// Initial page.
    pub page: u64,
    /// Page size; `None` means all records.
    pub per_page: Option<u64>,
    /// Pre-supplied total count, skipping the executor's count query.
    pub total_entries: Option<u64>,
    /// Baseline condition AND-ed in front of all generated filters.
    pub conditions: Option<Condition>,
    /// JOIN clauses passed through to the compiled query.
    pub joins: Vec<String>,
    /// Eager-load associations passed through to the compiled query.
    pub includes: Vec<String>,
    /// GROUP BY expression passed through to the compiled query.
    pub group: Option<String>,
    /// Custom ORDER BY hooks keyed by fully qualified column name.
    pub custom_order: BTreeMap<String, CustomOrder>,
    /// Saved query to load when the request carries no `q` parameter.
    pub saved_query: Option<i64>,
    /// Whether CSV export is permitted.
    pub enable_csv_export: bool,
    /// CSV field separator handed to the export renderer.
    pub csv_field_separator: String,
    /// Fixed CSV file name, if any.
    pub csv_file_name: Option<String>,
    /// Search-index backend configuration; `Some` selects that backend.
    pub search: Option<SearchOptions>,
}

impl GridOptions {
    /// Build options from the engine configuration defaults.
    pub fn from_config(config: &GridConfig) -> GridResult<Self> {
        let order_direction = OrderDirection::parse_strict(&config.defaults.order_direction)
            .ok_or_else(|| {
                GridError::configuration(format!(
                    "default order_direction must be 'asc' or 'desc', got '{}'",
                    config.defaults.order_direction
                ))
            })?;
        Ok(Self {
            name: config.defaults.name.clone(),
            order_direction,
            page: config.defaults.page,
            per_page: config.defaults.per_page,
            enable_csv_export: config.export.enable_csv,
            csv_field_separator: config.export.csv_field_separator.clone(),
            csv_file_name: config.export.csv_file_name.clone(),
            ..Self::default()
        })
    }

    /// Validate the options; called once at grid construction.
    pub fn validate(&self) -> GridResult<()> {
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(GridError::configuration(
                "name of the grid can only contain alphanumeric characters",
            ));
        }
        if self.name.is_empty() {
            return Err(GridError::configuration("name of the grid cannot be empty"));
        }
        for (column, custom) in &self.custom_order {
            if let CustomOrder::Template(template) = custom {
                if !template.contains('?') {
                    return Err(GridError::configuration(format!(
                        "custom order template for '{column}' must contain a ? placeholder"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether this grid compiles against the search-index backend.
    pub fn search_mode(&self) -> bool {
        self.search.is_some()
    }
}
