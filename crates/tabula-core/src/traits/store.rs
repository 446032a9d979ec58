//! The saved-query persistence seam.

use crate::result::GridResult;
use crate::types::saved_query::SavedQuery;

/// Key/value persistence for saved named queries.
///
/// Lookups are scoped by grid name: a query saved for one grid is
/// invisible to every other grid.
pub trait QueryStore: Send + Sync {
    /// Load a saved query by id, scoped to the named grid. `Ok(None)`
    /// when no such query exists; the engine logs the miss and proceeds
    /// as if no saved query had been requested.
    fn find_by_id(&self, id: i64, grid_name: &str) -> GridResult<Option<SavedQuery>>;

    /// Persist a query, returning its assigned id.
    fn save(&self, query: &SavedQuery) -> GridResult<i64>;
}
