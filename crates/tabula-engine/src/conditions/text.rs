//! String/text filter conditions.

use tracing::debug;

use tabula_core::types::{BindValue, Column, Condition, FilterInput};

use crate::conditions::ConditionGenerator;

/// Generator for string and text columns: substring `LIKE` matching with
/// an optional negation flag.
#[derive(Debug, Default)]
pub struct TextGenerator;

impl ConditionGenerator for TextGenerator {
    fn generate(
        &self,
        column: &Column,
        table_alias: Option<&str>,
        input: &FilterInput,
    ) -> Option<Condition> {
        let (fragment, negated) = match input {
            FilterInput::Scalar(s) => (s.as_str(), false),
            FilterInput::Text { value, negated } => (value.as_str(), *negated),
            _ => {
                debug!(
                    column = %column.name,
                    ?input,
                    "string filter must be a scalar or a {{v, n}} mapping"
                );
                return None;
            }
        };
        if fragment.is_empty() {
            return None;
        }
        let col = column.qualified_name(table_alias);
        let negation = if negated { "NOT " } else { "" };
        Some(Condition::new(
            format!("{negation}{col} LIKE ?"),
            vec![BindValue::Str(format!("%{fragment}%"))],
        ))
    }
}
