//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tabula_core::config::GridConfig;
use tabula_core::traits::{QueryExecutor, QueryStore};
use tabula_core::types::{Column, CompiledQuery, SavedQuery};
use tabula_core::GridResult;
use tabula_engine::{ColumnCatalog, GridContext, GridOptions};

/// Record type served by the fake executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: i64,
    pub status: String,
}

pub fn row(id: i64, status: &str) -> OrderRow {
    OrderRow {
        id,
        status: status.to_string(),
    }
}

/// Executor that records every query it is asked to run and serves
/// canned rows.
#[derive(Default)]
pub struct RecordingExecutor {
    pub rows: Vec<OrderRow>,
    pub count: u64,
    pub queries: Arc<Mutex<Vec<CompiledQuery>>>,
}

impl RecordingExecutor {
    pub fn with_rows(rows: Vec<OrderRow>) -> Self {
        Self {
            count: rows.len() as u64,
            rows,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, query: &CompiledQuery) {
        self.queries.lock().unwrap().push(query.clone());
    }
}

impl QueryExecutor for RecordingExecutor {
    type Record = OrderRow;

    fn execute_paged(&self, query: &CompiledQuery) -> GridResult<Vec<OrderRow>> {
        self.record(query);
        Ok(self.rows.clone())
    }

    fn execute_all(&self, query: &CompiledQuery) -> GridResult<Vec<OrderRow>> {
        self.record(query);
        Ok(self.rows.clone())
    }

    fn execute_count(&self, query: &CompiledQuery) -> GridResult<u64> {
        self.record(query);
        Ok(self.count)
    }

    fn distinct_values(&self, _column: &Column) -> GridResult<Vec<String>> {
        Ok(self.rows.iter().map(|r| r.status.clone()).collect())
    }
}

/// In-memory saved-query store.
#[derive(Default)]
pub struct InMemoryStore {
    pub saved: Vec<SavedQuery>,
}

impl QueryStore for InMemoryStore {
    fn find_by_id(&self, id: i64, grid_name: &str) -> GridResult<Option<SavedQuery>> {
        Ok(self
            .saved
            .iter()
            .find(|q| q.id == id && q.grid_name == grid_name)
            .cloned())
    }

    fn save(&self, query: &SavedQuery) -> GridResult<i64> {
        Ok(query.id)
    }
}

/// The orders schema every integration test runs against.
pub fn catalog() -> ColumnCatalog {
    ColumnCatalog::from_schema(
        "orders",
        [
            ("orders", "id", "integer"),
            ("orders", "status", "string"),
            ("orders", "notes", "text"),
            ("orders", "total", "decimal"),
            ("orders", "archived", "boolean"),
            ("orders", "placed_on", "date"),
            ("orders", "updated_at", "datetime"),
            ("orders", "payload", "jsonb"),
            ("customers", "name", "string"),
        ],
    )
}

pub fn context() -> GridContext {
    GridContext::from_config(&GridConfig::default())
}

pub fn options(name: &str) -> GridOptions {
    let mut opts = GridOptions::from_config(&GridConfig::default()).expect("default config valid");
    opts.name = name.to_string();
    opts
}
