//! Engine configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod defaults;
pub mod export;
pub mod logging;
pub mod parsing;

use serde::{Deserialize, Serialize};

use self::defaults::GridDefaultsConfig;
use self::export::ExportConfig;
use self::logging::LoggingConfig;
use self::parsing::ParsingConfig;

use crate::error::GridError;

/// Root engine configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GridConfig {
    /// Grid construction defaults.
    #[serde(default)]
    pub defaults: GridDefaultsConfig,
    /// CSV export settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Target database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Date/datetime parsing settings.
    #[serde(default)]
    pub parsing: ParsingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The relational engine family the grid compiles against.
///
/// Only identifier quoting depends on this; the compiled query itself is
/// placeholder-based and engine-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseFamily {
    /// PostgreSQL-compatible quoting (`"ident"`).
    #[default]
    Postgres,
    /// MySQL-compatible quoting (`` `ident` ``).
    MySql,
    /// SQLite quoting: qualified names are split on `.` and each chunk
    /// is quoted separately.
    Sqlite,
}

/// Target database configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// The relational engine family, used to pick the identifier
    /// quoting path.
    #[serde(default)]
    pub family: DatabaseFamily,
}

impl GridConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TABULA_`.
    pub fn load(env: &str) -> Result<Self, GridError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TABULA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GridError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| GridError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
