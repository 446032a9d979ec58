//! Extracts and normalizes a column's raw filter value from the full
//! filter status, ahead of condition generation.

use tracing::debug;

use tabula_core::traits::{DateParser, DateTimeParser};
use tabula_core::types::{
    Bound, Column, FilterInput, FilterStatus, Instant, ParamValue,
};

use crate::conditions::{looks_numeric, parts_to_date, parts_to_datetime};

/// The result of binding one column against the filter status: the filter
/// key that matched, and the normalized input if the raw value had a
/// usable shape. A `None` input still prunes the key after the generator
/// declines it.
#[derive(Debug, Clone)]
pub struct BoundFilter {
    /// The status key the column answered to.
    pub key: String,
    /// The normalized filter input, if usable.
    pub input: Option<FilterInput>,
}

/// Resolves filter keys and pre-parses date/datetime sub-structures
/// before handing off to a condition generator.
pub struct ColumnRequestBinder<'a> {
    date_parser: &'a dyn DateParser,
    datetime_parser: &'a dyn DateTimeParser,
}

impl<'a> ColumnRequestBinder<'a> {
    /// Create a binder over the injected date parsers.
    pub fn new(date_parser: &'a dyn DateParser, datetime_parser: &'a dyn DateTimeParser) -> Self {
        Self {
            date_parser,
            datetime_parser,
        }
    }

    /// Bind one column against the filter status.
    ///
    /// Key precedence: a main-table column answers to its bare name first;
    /// any column answers to its qualified `alias_or_table.name`. Returns
    /// `None` when neither key is present; the column contributes nothing.
    ///
    /// Unusable range bounds (digit-less numeric bounds, unparsable or
    /// invalid temporal bounds) are removed from the live status so they
    /// never round-trip back into links and forms.
    pub fn bind(
        &self,
        column: &Column,
        filters: &mut FilterStatus,
        table_alias: Option<&str>,
        custom_filter: bool,
    ) -> Option<BoundFilter> {
        let key = self.resolve_key(column, filters, table_alias)?;
        let raw = filters.get(&key)?.clone();
        let input = if custom_filter {
            shape_custom(column, &raw)
        } else {
            self.normalize(column, &key, &raw, filters)
        };
        Some(BoundFilter { key, input })
    }

    fn resolve_key(
        &self,
        column: &Column,
        filters: &FilterStatus,
        table_alias: Option<&str>,
    ) -> Option<String> {
        if column.main_table && filters.contains_key(&column.name) {
            return Some(column.name.clone());
        }
        let qualified = column.qualified_name(table_alias);
        filters.contains_key(&qualified).then_some(qualified)
    }

    fn normalize(
        &self,
        column: &Column,
        key: &str,
        raw: &ParamValue,
        filters: &mut FilterStatus,
    ) -> Option<FilterInput> {
        match raw {
            ParamValue::Str(s) => Some(FilterInput::Scalar(s.clone())),
            ParamValue::Seq(v) => Some(FilterInput::Many(v.clone())),
            ParamValue::Map(m) if m.contains_key("v") => Some(FilterInput::Text {
                value: m
                    .get("v")
                    .and_then(ParamValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
                negated: m.get("n").and_then(ParamValue::as_str) == Some("1"),
            }),
            ParamValue::Map(m) => {
                let from = self.normalize_bound(column, key, "fr", m.get("fr"), filters);
                let to = self.normalize_bound(column, key, "to", m.get("to"), filters);
                Some(FilterInput::Range { from, to })
            }
        }
    }

    /// Normalize one end of a range. Temporal columns get their string
    /// bounds parsed and their calendar-part maps constructed; numeric
    /// columns get the digit guard. A bound that fails is pruned from the
    /// live status and degrades to `None`, never an error.
    fn normalize_bound(
        &self,
        column: &Column,
        key: &str,
        end: &str,
        raw: Option<&ParamValue>,
        filters: &mut FilterStatus,
    ) -> Option<Bound> {
        let raw = raw?;
        let bound = if column.column_type.is_temporal() {
            self.parse_temporal_bound(column, raw)
        } else {
            match raw {
                ParamValue::Str(s) if !column.column_type.is_numeric() || looks_numeric(s) => {
                    Some(Bound::Raw(s.clone()))
                }
                _ => None,
            }
        };
        if bound.is_none() {
            debug!(
                column = %column.name,
                key,
                end,
                ?raw,
                "dropping unusable range bound"
            );
            prune_bound(filters, key, end);
        }
        bound
    }

    fn parse_temporal_bound(&self, column: &Column, raw: &ParamValue) -> Option<Bound> {
        let with_time = column.column_type.needs_datetime_parts();
        match raw {
            ParamValue::Str(s) => {
                let instant = if with_time {
                    self.datetime_parser.parse(s).map(Instant::DateTime)
                } else {
                    self.date_parser.parse(s).map(Instant::Date)
                };
                instant.map(Bound::Instant)
            }
            ParamValue::Map(parts) => {
                let instant = if with_time {
                    parts_to_datetime(parts).map(Instant::DateTime)
                } else {
                    parts_to_date(parts).map(Instant::Date)
                };
                instant.map(Bound::Instant)
            }
            ParamValue::Seq(_) => None,
        }
    }
}

fn shape_custom(column: &Column, raw: &ParamValue) -> Option<FilterInput> {
    match raw {
        ParamValue::Str(s) => Some(FilterInput::Scalar(s.clone())),
        ParamValue::Seq(v) => Some(FilterInput::Many(v.clone())),
        ParamValue::Map(_) => {
            debug!(column = %column.name, "custom filter value cannot be a mapping");
            None
        }
    }
}

fn prune_bound(filters: &mut FilterStatus, key: &str, end: &str) {
    if let Some(ParamValue::Map(m)) = filters.get_mut(key) {
        m.remove(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tabula_core::config::parsing::ParsingConfig;
    use tabula_core::traits::{ChronoDateParser, ChronoDateTimeParser};
    use tabula_core::types::ColumnType;

    fn parsers() -> (ChronoDateParser, ChronoDateTimeParser) {
        let config = ParsingConfig::default();
        (
            ChronoDateParser::new(&config),
            ChronoDateTimeParser::new(&config),
        )
    }

    fn range_value(pairs: &[(&str, &str)]) -> ParamValue {
        ParamValue::Map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), ParamValue::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_main_table_bare_key_takes_precedence() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("orders", "total", ColumnType::Decimal, true);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert("total".to_string(), ParamValue::from("bare"));
        filters.insert("orders.total".to_string(), ParamValue::from("qualified"));
        let bound = binder.bind(&column, &mut filters, None, true).expect("bound");
        assert_eq!(bound.key, "total");
        assert_eq!(bound.input, Some(FilterInput::Scalar("bare".to_string())));
    }

    #[test]
    fn test_joined_column_requires_qualified_key() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("customers", "name", ColumnType::String, false);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert("name".to_string(), ParamValue::from("bare"));
        assert!(binder.bind(&column, &mut filters, None, false).is_none());
        filters.insert("customers.name".to_string(), ParamValue::from("abc"));
        let bound = binder.bind(&column, &mut filters, None, false).expect("bound");
        assert_eq!(bound.key, "customers.name");
    }

    #[test]
    fn test_table_alias_changes_qualified_key() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("customers", "name", ColumnType::String, false);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert("c.name".to_string(), ParamValue::from("abc"));
        let bound = binder
            .bind(&column, &mut filters, Some("c"), false)
            .expect("bound");
        assert_eq!(bound.key, "c.name");
    }

    #[test]
    fn test_text_map_normalizes_negation_flag() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("customers", "name", ColumnType::String, true);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert(
            "name".to_string(),
            range_value(&[("v", "abc"), ("n", "1")]),
        );
        let bound = binder.bind(&column, &mut filters, None, false).expect("bound");
        assert_eq!(
            bound.input,
            Some(FilterInput::Text {
                value: "abc".to_string(),
                negated: true,
            })
        );
    }

    #[test]
    fn test_numeric_bound_guard_prunes_status() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("orders", "total", ColumnType::Integer, true);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert("total".to_string(), range_value(&[("fr", "10"), ("to", "abc")]));
        let bound = binder.bind(&column, &mut filters, None, false).expect("bound");
        assert_eq!(
            bound.input,
            Some(FilterInput::Range {
                from: Some(Bound::Raw("10".to_string())),
                to: None,
            })
        );
        // The non-numeric bound is gone from the live status.
        let remaining = filters.get("total").and_then(|v| v.get("to"));
        assert!(remaining.is_none());
        assert!(filters.get("total").and_then(|v| v.get("fr")).is_some());
    }

    #[test]
    fn test_temporal_string_bound_parses_to_instant() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("orders", "shipped_on", ColumnType::Date, true);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert("shipped_on".to_string(), range_value(&[("fr", "2021-03-15")]));
        let bound = binder.bind(&column, &mut filters, None, false).expect("bound");
        match bound.input {
            Some(FilterInput::Range {
                from: Some(Bound::Instant(Instant::Date(d))),
                to: None,
            }) => assert_eq!(d.to_string(), "2021-03-15"),
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_calendar_parts_degrade_silently() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("orders", "shipped_on", ColumnType::Date, true);
        let mut filters: FilterStatus = BTreeMap::new();
        let parts = ParamValue::Map(
            [
                ("fr".to_string(), range_value(&[("year", "2020"), ("month", "2"), ("day", "30")])),
            ]
            .into_iter()
            .collect(),
        );
        filters.insert("shipped_on".to_string(), parts);
        let bound = binder.bind(&column, &mut filters, None, false).expect("bound");
        assert_eq!(bound.input, Some(FilterInput::Range { from: None, to: None }));
        assert!(filters.get("shipped_on").and_then(|v| v.get("fr")).is_none());
    }

    #[test]
    fn test_custom_filter_skips_normalization() {
        let (dp, dtp) = parsers();
        let binder = ColumnRequestBinder::new(&dp, &dtp);
        let column = Column::new("orders", "shipped_on", ColumnType::Date, true);
        let mut filters: FilterStatus = BTreeMap::new();
        filters.insert(
            "shipped_on".to_string(),
            ParamValue::Seq(vec!["1".to_string(), "null".to_string()]),
        );
        let bound = binder.bind(&column, &mut filters, None, true).expect("bound");
        assert_eq!(
            bound.input,
            Some(FilterInput::Many(vec!["1".to_string(), "null".to_string()]))
        );
    }
}
