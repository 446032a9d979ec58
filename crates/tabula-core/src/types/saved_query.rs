//! Saved named queries: persisted filter/sort state, retrievable by id
//! and grid name through the `QueryStore` collaborator.

use serde::{Deserialize, Serialize};

use crate::types::filter::FilterStatus;

/// The slice of grid status a saved query persists and replays.
///
/// A blank saved entry *clears* the corresponding live value when the
/// query is applied; a present entry overrides it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedStatus {
    /// Saved filter values.
    pub filters: FilterStatus,
    /// Saved order column reference.
    pub order: Option<String>,
    /// Saved order direction (raw, normalized on application).
    pub order_direction: Option<String>,
}

/// A persisted serialization of filter/sort state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    /// Store-assigned identifier.
    pub id: i64,
    /// The grid this query belongs to; lookups are scoped by it.
    pub grid_name: String,
    /// The persisted status.
    pub status: SavedStatus,
}
