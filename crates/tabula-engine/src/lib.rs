//! # tabula-engine
//!
//! The filter-and-query compilation engine: takes a declared column
//! catalog, a merged filter/sort/page status, and raw request parameters,
//! and deterministically compiles them into a backend-executable query
//! specification: relational WHERE/ORDER/pagination with positional
//! binds, or an equivalent search-index query.
//!
//! One [`state::GridState`] instance is constructed, consulted, and
//! discarded within a single request/response cycle. It holds no
//! cross-request shared state and is single-owner-at-a-time: compilation
//! memoization is instance-local and not safe for concurrent mutation.

pub mod backend;
pub mod binder;
pub mod catalog;
pub mod conditions;
pub mod options;
pub mod quoting;
pub mod state;
pub mod status;

pub use catalog::ColumnCatalog;
pub use conditions::GeneratorRegistry;
pub use options::{CompileOptions, CustomOrder, ExportMode, GridOptions, SearchOptions};
pub use state::{GridContext, GridState};
pub use status::GridStatus;
