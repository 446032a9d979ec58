//! Numeric range filter conditions.

use tracing::debug;

use tabula_core::types::{BindValue, Bound, Column, Condition, FilterInput};

use crate::conditions::{looks_numeric, ConditionGenerator};

/// Generator for integer, float, and decimal columns: an AND-combined
/// `>= / <=` range. A bound without a single digit is unusable and is
/// silently dropped.
#[derive(Debug, Default)]
pub struct NumericGenerator;

fn usable(bound: &Option<Bound>) -> Option<&str> {
    match bound {
        Some(Bound::Raw(s)) if looks_numeric(s) => Some(s),
        _ => None,
    }
}

impl ConditionGenerator for NumericGenerator {
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition> {
        let FilterInput::Range { from, to } = input else {
            debug!(column = %column.name, ?input, "numeric filter must be a {{fr, to}} range");
            return None;
        };
        let col = column.qualified_name(table_alias);
        let mut pieces = Vec::new();
        let mut binds = Vec::new();
        if let Some(fr) = usable(from) {
            pieces.push(format!("{col} >= ?"));
            binds.push(BindValue::Str(fr.to_string()));
        }
        if let Some(to) = usable(to) {
            pieces.push(format!("{col} <= ?"));
            binds.push(BindValue::Str(to.to_string()));
        }
        if pieces.is_empty() {
            return None;
        }
        Some(Condition::new(pieces.join(" and "), binds))
    }
}
