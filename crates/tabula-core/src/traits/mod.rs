//! Collaborator traits.
//!
//! The engine performs no I/O of its own: executing compiled queries,
//! loading saved queries, and parsing free-text dates are all injected
//! behind these seams. All calls are synchronous and blocking; timeouts
//! and cancellation are the collaborator's responsibility.

pub mod executor;
pub mod parser;
pub mod store;

pub use executor::QueryExecutor;
pub use parser::{ChronoDateParser, ChronoDateTimeParser, DateParser, DateTimeParser};
pub use store::QueryStore;
