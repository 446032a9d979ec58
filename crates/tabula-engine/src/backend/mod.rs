//! Backend compilation: one capability interface, two implementations.
//!
//! The backend is selected exactly once, at grid construction, from the
//! presence of search options; it never changes for the instance's
//! lifetime.

pub mod relational;
pub mod search;

use tabula_core::config::DatabaseFamily;
use tabula_core::traits::DateTimeParser;
use tabula_core::types::{Column, CompiledQuery, Condition};
use tabula_core::GridResult;

use crate::options::{CompileOptions, GridOptions};
use crate::status::GridStatus;

pub use relational::RelationalBackend;
pub use search::SearchBackend;

/// Everything a backend needs to compile: the grid's options and merged
/// status, the accumulated per-column condition fragments in declaration
/// order, and the environment.
pub struct CompileContext<'a> {
    /// Validated construction options.
    pub options: &'a GridOptions,
    /// Merged per-request status.
    pub status: &'a GridStatus,
    /// Condition fragments in column-declaration order.
    pub fragments: &'a [(Column, Condition)],
    /// The grid's primary table, used to qualify bare order references.
    pub default_table: &'a str,
    /// Engine family for identifier quoting.
    pub family: DatabaseFamily,
    /// Datetime parser, used by the search backend to tell numeric from
    /// temporal range filters.
    pub datetime_parser: &'a dyn DateTimeParser,
}

/// Compiles a grid's status into a backend-executable query spec.
pub trait Backend: Send + Sync {
    /// Compile. Pure with respect to the context; memoization lives in
    /// the grid state, not here.
    fn compile(&self, ctx: &CompileContext<'_>, opts: &CompileOptions)
        -> GridResult<CompiledQuery>;
}

/// Pick the backend for a grid, once.
pub fn select_backend(options: &GridOptions) -> Box<dyn Backend> {
    if options.search_mode() {
        Box::new(SearchBackend)
    } else {
        Box::new(RelationalBackend)
    }
}
