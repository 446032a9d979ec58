//! Shared type vocabulary for the grid engine.

pub mod column;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod query;
pub mod saved_query;
pub mod sorting;

pub use column::{Column, ColumnType};
pub use filter::{BindValue, Bound, Condition, FilterInput, FilterStatus, Instant};
pub use pagination::PageBounds;
pub use params::{ParamValue, RequestParams};
pub use query::{CompiledQuery, RelationalQuery, SearchOrder, SearchQuery, WithFilter};
pub use saved_query::{SavedQuery, SavedStatus};
pub use sorting::OrderDirection;
