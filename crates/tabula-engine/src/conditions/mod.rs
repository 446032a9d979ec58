//! The per-type condition generator family.
//!
//! Each generator is a pure function from `(column, table alias, filter
//! input)` to an optional [`Condition`]. `None` means "no condition": the
//! filter contributes nothing and its key is pruned from status. Wrong
//! shapes and unusable values degrade to `None` with a debug log, never
//! an error, so one bad filter cannot break the whole grid.
//!
//! Dispatch is a closed registry value built once at process start and
//! injected into every grid; adding a column type means adding a variant
//! and a registry arm, never mutating a global table.

pub mod boolean;
pub mod custom;
pub mod numeric;
pub mod temporal;
pub mod text;

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use tabula_core::types::{Column, ColumnType, Condition, FilterInput, ParamValue};

pub use boolean::BooleanGenerator;
pub use custom::CustomGenerator;
pub use numeric::NumericGenerator;
pub use temporal::TemporalGenerator;
pub use text::TextGenerator;

/// A pure per-type condition generator.
pub trait ConditionGenerator: Send + Sync {
    /// Generate the condition fragment for one column's filter value.
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition>;
}

/// The closed generator dispatch table, keyed by column type group.
///
/// Built once and shared by reference; never mutated after construction.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    boolean: BooleanGenerator,
    text: TextGenerator,
    numeric: NumericGenerator,
    temporal: TemporalGenerator,
    custom: CustomGenerator,
}

impl GeneratorRegistry {
    /// Create the registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The generator for a column type, or `None` for types the engine
    /// has no generator for (the caller logs and drops the filter).
    pub fn for_type(&self, column_type: &ColumnType) -> Option<&dyn ConditionGenerator> {
        match column_type {
            ColumnType::Boolean => Some(&self.boolean),
            ColumnType::String | ColumnType::Text => Some(&self.text),
            ColumnType::Integer | ColumnType::Float | ColumnType::Decimal => Some(&self.numeric),
            ColumnType::Date | ColumnType::DateTime | ColumnType::Timestamp => {
                Some(&self.temporal)
            }
            ColumnType::Other(_) => None,
        }
    }

    /// The custom-filter escape hatch, bypassing type dispatch entirely.
    pub fn custom(&self) -> &dyn ConditionGenerator {
        &self.custom
    }
}

/// Whether a string is one of the special-value sentinels `null` /
/// `not null` (case-insensitive, surrounding whitespace allowed).
pub fn is_special_value(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "null" {
        return true;
    }
    // "not null" needs at least one whitespace character between the words.
    match lower.strip_prefix("not") {
        Some(rest) => {
            let stripped = rest.trim_start();
            stripped == "null" && stripped.len() < rest.len()
        }
        None => false,
    }
}

/// The numeric-bound guard: a usable bound contains at least one digit.
pub fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

fn part(parts: &BTreeMap<String, ParamValue>, key: &str) -> Option<u32> {
    let raw = parts.get(key)?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Construct a date from calendar parts (`{year, month, day}`).
/// Missing month/day default to 1; anything invalid (month 13, Feb 30,
/// unparsable year) yields `None`, swallowed by the caller.
pub fn parts_to_date(parts: &BTreeMap<String, ParamValue>) -> Option<NaiveDate> {
    let year = i32::try_from(part(parts, "year")?).ok()?;
    let month = part(parts, "month").unwrap_or(1);
    let day = part(parts, "day").unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Construct a datetime from calendar parts
/// (`{year, month, day, hour, minute}`); missing time parts default to 0.
pub fn parts_to_datetime(parts: &BTreeMap<String, ParamValue>) -> Option<NaiveDateTime> {
    let date = parts_to_date(parts)?;
    let hour = part(parts, "hour").unwrap_or(0);
    let minute = part(parts, "minute").unwrap_or(0);
    date.and_hms_opt(hour, minute, 0)
}
