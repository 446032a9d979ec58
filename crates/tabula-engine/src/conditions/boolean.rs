//! Boolean filter conditions.

use tracing::debug;

use tabula_core::types::{BindValue, Column, Condition, FilterInput};

use crate::conditions::ConditionGenerator;

/// Generator for boolean columns.
///
/// The filter widget submits a one-element array: `['t']` or `['f']`.
/// False filters also match NULL, since an unset flag and a false flag
/// read the same to the user.
#[derive(Debug, Default)]
pub struct BooleanGenerator;

impl ConditionGenerator for BooleanGenerator {
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition> {
        let FilterInput::Many(values) = input else {
            debug!(column = %column.name, ?input, "boolean filter must be a one-element array");
            return None;
        };
        if values.len() != 1 {
            debug!(column = %column.name, ?values, "boolean filter must be a one-element array");
            return None;
        }
        let col = column.qualified_name(table_alias);
        match values[0].as_str() {
            "f" => Some(Condition::new(
                format!("({col} = ? OR {col} IS NULL)"),
                vec![BindValue::Bool(false)],
            )),
            "t" => Some(Condition::new(
                format!("{col} = ?"),
                vec![BindValue::Bool(true)],
            )),
            _ => None,
        }
    }
}
