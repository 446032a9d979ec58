//! Injectable date/datetime parsers for free-text range bounds.

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::parsing::ParsingConfig;

/// Parses a free-text filter bound into a date. Returns `None` on
/// failure; the engine degrades the bound silently rather than erroring.
pub trait DateParser: Send + Sync {
    /// Parse a user-typed date string.
    fn parse(&self, raw: &str) -> Option<NaiveDate>;
}

/// Parses a free-text filter bound into a datetime.
pub trait DateTimeParser: Send + Sync {
    /// Parse a user-typed datetime string.
    fn parse(&self, raw: &str) -> Option<NaiveDateTime>;
}

/// Default date parser driven by the configured `chrono` format string.
#[derive(Debug, Clone)]
pub struct ChronoDateParser {
    format: String,
}

impl ChronoDateParser {
    /// Create a parser for the configured date format.
    pub fn new(config: &ParsingConfig) -> Self {
        Self {
            format: config.date_format.clone(),
        }
    }
}

impl DateParser for ChronoDateParser {
    fn parse(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), &self.format).ok()
    }
}

/// Default datetime parser driven by the configured `chrono` format
/// string, falling back to date-only input at midnight.
#[derive(Debug, Clone)]
pub struct ChronoDateTimeParser {
    format: String,
    date_format: String,
}

impl ChronoDateTimeParser {
    /// Create a parser for the configured datetime format.
    pub fn new(config: &ParsingConfig) -> Self {
        Self {
            format: config.datetime_format.clone(),
            date_format: config.date_format.clone(),
        }
    }
}

impl DateTimeParser for ChronoDateTimeParser {
    fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, &self.format).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, &self.date_format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    }
}
