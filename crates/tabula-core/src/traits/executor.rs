//! The query execution seam.

use crate::result::GridResult;
use crate::types::column::Column;
use crate::types::query::CompiledQuery;

/// Executes compiled queries against a concrete datastore or search index.
///
/// The engine produces query specifications; running them is entirely the
/// executor's concern. One grid instance owns one executor for one
/// request/response cycle.
pub trait QueryExecutor: Send + Sync {
    /// The record type a query yields.
    type Record;

    /// Execute a query honoring its pagination bounds.
    fn execute_paged(&self, query: &CompiledQuery) -> GridResult<Vec<Self::Record>>;

    /// Execute a query ignoring pagination, returning every matching record.
    fn execute_all(&self, query: &CompiledQuery) -> GridResult<Vec<Self::Record>>;

    /// Count the records matching a query's conditions.
    fn execute_count(&self, query: &CompiledQuery) -> GridResult<u64>;

    /// All distinct values of a column, unfiltered. Used to populate
    /// dropdown filters; ordering and blank-stripping happen in the engine.
    fn distinct_values(&self, column: &Column) -> GridResult<Vec<String>>;
}
