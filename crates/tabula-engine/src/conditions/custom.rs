//! The custom-filter escape hatch.

use tracing::debug;

use tabula_core::types::{BindValue, Column, Condition, FilterInput};

use crate::conditions::{is_special_value, ConditionGenerator};

/// Generator for columns with a custom filter, bypassing type dispatch
/// entirely.
///
/// Accepts a scalar or an array of scalars. The sentinel strings `null`
/// and `not null` select `IS [NOT] NULL` checks; everything else is
/// equality (scalar) or `IN` membership (array), with sentinels and
/// normal values OR-combined when mixed.
#[derive(Debug, Default)]
pub struct CustomGenerator;

fn null_check(col: &str, sentinel: &str) -> String {
    if sentinel.to_ascii_lowercase().contains("not") {
        format!("{col} IS NOT NULL")
    } else {
        format!("{col} IS NULL")
    }
}

impl ConditionGenerator for CustomGenerator {
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition> {
        let col = column.qualified_name(table_alias);
        match input {
            FilterInput::Scalar(value) => generate_scalar(&col, value),
            FilterInput::Many(values) => {
                if values.is_empty() || (values.len() == 1 && values[0].trim().is_empty()) {
                    return None;
                }
                // One-element arrays collapse to scalar semantics.
                if values.len() == 1 {
                    return generate_scalar(&col, &values[0]);
                }
                let (specials, normal): (Vec<&String>, Vec<&String>) =
                    values.iter().partition(|v| is_special_value(v));

                let mut binds = Vec::new();
                let in_clause = if normal.is_empty() {
                    None
                } else {
                    let placeholders = vec!["?"; normal.len()].join(", ");
                    binds.extend(normal.iter().map(|v| BindValue::Str((*v).clone())));
                    Some(format!("{col} IN ({placeholders})"))
                };
                let special_clause = if specials.is_empty() {
                    None
                } else {
                    Some(
                        specials
                            .iter()
                            .map(|v| null_check(&col, v))
                            .collect::<Vec<_>>()
                            .join(" or "),
                    )
                };
                let sql = match (in_clause, special_clause) {
                    (Some(inc), Some(spec)) => format!("({inc} or {spec})"),
                    (Some(inc), None) => inc,
                    (None, Some(spec)) => format!("({spec})"),
                    (None, None) => return None,
                };
                Some(Condition::new(sql, binds))
            }
            _ => {
                debug!(
                    column = %column.name,
                    ?input,
                    "custom filter must be a scalar or an array of scalars"
                );
                None
            }
        }
    }
}

fn generate_scalar(col: &str, value: &str) -> Option<Condition> {
    if value.trim().is_empty() {
        return None;
    }
    if is_special_value(value) {
        Some(Condition::raw(null_check(col, value)))
    } else {
        Some(Condition::new(
            format!("{col} = ?"),
            vec![BindValue::Str(value.to_string())],
        ))
    }
}
