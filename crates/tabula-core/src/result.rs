//! Convenience result type alias for Tabula.

use crate::error::GridError;

/// A specialized `Result` type for grid operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, GridError>` explicitly.
pub type GridResult<T> = Result<T, GridError>;
