//! The mutable per-request grid status.
//!
//! Status is initialized once by merging, in increasing priority:
//! compile-time defaults, constructor options, a loaded saved query (if
//! one was referenced), and live request parameters. It then lives for
//! one request/grid instance: filter keys that produce no condition are
//! pruned, and the whole thing can be re-serialized into parameter pairs
//! for stateful links and forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tabula_core::types::{FilterStatus, OrderDirection, ParamValue, SavedStatus};

use crate::options::{ExportMode, GridOptions};

/// Merged filter/sort/page state for one grid instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridStatus {
    /// Current filter values, keyed by filter key.
    pub filters: FilterStatus,
    /// Order column reference (bare or qualified).
    pub order: Option<String>,
    /// Order direction; normalized on every assignment.
    pub order_direction: OrderDirection,
    /// Current page (1-based).
    pub page: u64,
    /// Page size; `None` means all records.
    pub per_page: Option<u64>,
    /// All-records page-size override (the `pp` request parameter). Its
    /// presence switches the grid into all-records mode; the value is
    /// recomputed from an unfiltered count on read.
    pub pp: Option<u64>,
    /// Pre-supplied total entries, skipping the executor's count query.
    pub total_entries: Option<u64>,
    /// Output mode.
    pub export: ExportMode,
    /// Free-text query (search-index mode).
    pub search_text: Option<String>,
    /// Index match mode (search-index mode).
    pub match_mode: Option<String>,
    /// Configured sort mode (search-index mode).
    pub sort_mode: Option<String>,
}

impl GridStatus {
    /// Seed status from validated construction options.
    pub fn from_options(options: &GridOptions) -> Self {
        let mut status = Self {
            order: options.order.clone(),
            order_direction: options.order_direction,
            page: options.page,
            per_page: options.per_page,
            total_entries: options.total_entries,
            ..Self::default()
        };
        if let Some(search) = &options.search {
            status.search_text = search.search_text.clone();
            status.match_mode = search.match_mode.clone();
            status.sort_mode = search.sort_mode.clone();
        }
        status
    }

    /// Apply a loaded saved query. Non-blank saved entries override the
    /// current value; blank ones are no-ops, so option-derived defaults
    /// survive and request parameters applied afterwards still win.
    pub fn apply_saved_query(&mut self, saved: &SavedStatus) {
        if !saved.filters.is_empty() {
            self.filters = saved.filters.clone();
        }
        if let Some(order) = &saved.order {
            if !order.trim().is_empty() {
                self.order = Some(order.clone());
            }
        }
        if let Some(direction) = &saved.order_direction {
            if !direction.trim().is_empty() {
                self.order_direction = OrderDirection::normalize(direction);
            }
        }
    }

    /// Merge this grid's live request parameters over the current status.
    /// The `q` saved-query reference is handled by the grid itself and
    /// ignored here.
    pub fn apply_request_params(
        &mut self,
        grid_params: &BTreeMap<String, ParamValue>,
        csv_export_enabled: bool,
    ) {
        if let Some(ParamValue::Map(f)) = grid_params.get("f") {
            self.filters = f.clone();
        }
        if let Some(order) = grid_params.get("order").and_then(ParamValue::as_str) {
            self.order = Some(order.to_string());
        }
        if let Some(direction) = grid_params
            .get("order_direction")
            .and_then(ParamValue::as_str)
        {
            self.order_direction = OrderDirection::normalize(direction);
        }
        if let Some(page) = grid_params.get("page").and_then(ParamValue::as_str) {
            self.page = page.trim().parse().unwrap_or(1).max(1);
        }
        if let Some(pp) = grid_params.get("pp").and_then(ParamValue::as_str) {
            self.pp = pp.trim().parse().ok();
        }
        match grid_params.get("export").and_then(ParamValue::as_str) {
            Some("csv") if csv_export_enabled => self.export = ExportMode::Csv,
            _ => self.export = ExportMode::None,
        }
        if let Some(text) = grid_params.get("search_text").and_then(ParamValue::as_str) {
            self.search_text = Some(text.to_string());
        }
    }

    /// Whether the grid is in all-records mode (explicit page-size
    /// override via `pp`).
    pub fn all_records_mode(&self) -> bool {
        self.pp.is_some()
    }

    /// Serialize the status into ordered `(parameter name, value)` pairs
    /// for stateful links and forms. Array-valued filters expand to
    /// repeated `name[]` pairs.
    pub fn parameter_pairs(
        &self,
        grid_name: &str,
        saved_query_id: Option<i64>,
    ) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.filters {
            flatten_param(&format!("{grid_name}[f][{key}]"), value, &mut pairs);
        }
        if let Some(id) = saved_query_id {
            pairs.push((format!("{grid_name}[q]"), id.to_string()));
        }
        if let Some(order) = &self.order {
            pairs.push((format!("{grid_name}[order]"), order.clone()));
        }
        if self.order_direction.is_specified() {
            pairs.push((
                format!("{grid_name}[order_direction]"),
                self.order_direction.as_sql().to_string(),
            ));
        }
        pairs
    }
}

fn flatten_param(prefix: &str, value: &ParamValue, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Str(s) => out.push((prefix.to_string(), s.clone())),
        ParamValue::Seq(values) => {
            for v in values {
                out.push((format!("{prefix}[]"), v.clone()));
            }
        }
        ParamValue::Map(map) => {
            for (key, sub) in map {
                flatten_param(&format!("{prefix}[{key}]"), sub, out);
            }
        }
    }
}
