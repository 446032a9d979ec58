//! Date/datetime range filter conditions.

use tracing::debug;

use tabula_core::types::{BindValue, Bound, Column, Condition, FilterInput};

use crate::conditions::ConditionGenerator;

/// Generator for date, datetime, and timestamp columns.
///
/// By the time a range reaches this generator the binder has already
/// normalized each bound into a parsed [`Instant`](tabula_core::types::Instant)
/// or dropped it (unparsable text, invalid calendar parts), so there is
/// no guard here; present bounds are AND-combined.
#[derive(Debug, Default)]
pub struct TemporalGenerator;

fn instant_bind(bound: &Option<Bound>) -> Option<BindValue> {
    match bound {
        Some(Bound::Instant(instant)) => Some(BindValue::from(*instant)),
        _ => None,
    }
}

impl ConditionGenerator for TemporalGenerator {
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition> {
        let FilterInput::Range { from, to } = input else {
            debug!(column = %column.name, ?input, "temporal filter must be a {{fr, to}} range");
            return None;
        };
        let col = column.qualified_name(table_alias);
        let mut pieces = Vec::new();
        let mut binds = Vec::new();
        if let Some(bind) = instant_bind(from) {
            pieces.push(format!("{col} >= ?"));
            binds.push(bind);
        }
        if let Some(bind) = instant_bind(to) {
            pieces.push(format!("{col} <= ?"));
            binds.push(bind);
        }
        if pieces.is_empty() {
            return None;
        }
        Some(Condition::new(pieces.join(" and "), binds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tabula_core::types::{ColumnType, Instant};

    fn column() -> Column {
        Column::new("orders", "shipped_on", ColumnType::Date, true)
    }

    fn date(y: i32, m: u32, d: u32) -> Bound {
        Bound::Instant(Instant::Date(
            NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
        ))
    }

    #[test]
    fn test_range_bounds_and_combined() {
        let input = FilterInput::Range {
            from: Some(date(2021, 1, 1)),
            to: Some(date(2021, 12, 31)),
        };
        let cond = TemporalGenerator
            .generate(&column(), None, &input)
            .expect("condition");
        assert_eq!(
            cond.sql,
            "orders.shipped_on >= ? and orders.shipped_on <= ?"
        );
        assert_eq!(cond.binds.len(), 2);
    }

    #[test]
    fn test_lower_bound_only() {
        let input = FilterInput::Range {
            from: Some(date(2021, 1, 1)),
            to: None,
        };
        let cond = TemporalGenerator
            .generate(&column(), None, &input)
            .expect("condition");
        assert_eq!(cond.sql, "orders.shipped_on >= ?");
    }

    #[test]
    fn test_dropped_bounds_yield_no_condition() {
        let input = FilterInput::Range {
            from: None,
            to: None,
        };
        assert!(TemporalGenerator.generate(&column(), None, &input).is_none());
        // Raw bounds never reach this generator; they are ignored if they do.
        let raw = FilterInput::Range {
            from: Some(Bound::Raw("2021-01-01".to_string())),
            to: None,
        };
        assert!(TemporalGenerator.generate(&column(), None, &raw).is_none());
    }
}
