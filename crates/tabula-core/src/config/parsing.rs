//! Date/datetime parsing configuration.

use serde::{Deserialize, Serialize};

/// Formats used by the default date and datetime parsers when turning
/// free-text filter bounds into instants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// `chrono` format string for plain dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// `chrono` format string for datetimes.
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            datetime_format: default_datetime_format(),
        }
    }
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}
