//! Tracing subscriber setup for host applications.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::logging::LoggingConfig;

/// Install the global tracing subscriber from the logging configuration.
///
/// `RUST_LOG` wins over the configured level when set. Call this once at
/// application startup; embedding applications with their own subscriber
/// should skip it.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
