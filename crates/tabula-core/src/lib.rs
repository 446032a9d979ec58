//! # tabula-core
//!
//! Core crate for the Tabula data-grid engine. Contains the column and
//! filter type vocabulary, collaborator traits, configuration schemas,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Tabula crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::GridError;
pub use result::GridResult;
