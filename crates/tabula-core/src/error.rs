//! Unified error types for Tabula.
//!
//! All crates map their internal errors into [`GridError`] for consistent
//! propagation through the ? operator. Per-filter input problems are *not*
//! errors: they are logged and degrade to "no condition" so one bad filter
//! value can never break a whole grid.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Invalid grid construction: bad grid name, bad option values,
    /// a declared column missing from the target table, or an invalid
    /// custom-order specification.
    Configuration,
    /// An operation was invoked out of sequence, such as reading the
    /// post-render accessors before rendering has completed.
    State,
    /// A malformed filter value was rejected by a collaborator. The engine
    /// itself never raises this kind; it degrades silently instead.
    Filter,
    /// The requested resource (such as a saved query) was not found.
    NotFound,
    /// An injected collaborator (executor, query store) failed.
    Execution,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::State => write!(f, "STATE"),
            Self::Filter => write!(f, "FILTER"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Execution => write!(f, "EXECUTION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified error used throughout Tabula.
///
/// Crate-specific and collaborator errors are mapped into `GridError` using
/// `From` impls or explicit `.map_err()` calls, giving the whole engine a
/// single error type at its boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct GridError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GridError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a state-sequence error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, message)
    }

    /// Create a filter error.
    pub fn filter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Filter, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, message)
    }
}

impl Clone for GridError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for GridError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
