//! Search-index query compilation.

use chrono::Duration;
use tracing::debug;

use tabula_core::types::{
    CompiledQuery, PageBounds, ParamValue, SearchOrder, SearchQuery, WithFilter,
};
use tabula_core::{GridError, GridResult};

use crate::backend::{Backend, CompileContext};
use crate::options::CompileOptions;

/// Compiles the grid status into a search-index query spec.
///
/// Filter keys that match a configured index field become baseline query
/// conditions; everything else becomes a "with" attribute filter. Note
/// the documented contract for array values: only the **first** element
/// survives. This mirrors the long-standing behavior of the filter
/// routing and is asserted by tests; callers relying on multi-value
/// attribute filters must use query conditions instead.
#[derive(Debug, Default)]
pub struct SearchBackend;

impl Backend for SearchBackend {
    fn compile(
        &self,
        ctx: &CompileContext<'_>,
        opts: &CompileOptions,
    ) -> GridResult<CompiledQuery> {
        let search = ctx.options.search.as_ref().ok_or_else(|| {
            GridError::configuration("search backend selected without search options")
        })?;

        let mut query = SearchQuery {
            search_text: ctx.status.search_text.clone(),
            index_names: search.index_names.clone(),
            index_weights: search.index_weights.clone(),
            match_mode: ctx.status.match_mode.clone(),
            with_filters: search.with.clone(),
            ..SearchQuery::default()
        };

        for (key, value) in &ctx.status.filters {
            let field = index_field_name(key);
            if search.index_names.iter().any(|name| name == &field) {
                query.conditions.insert(field, value.clone());
            } else if !query.with_filters.contains_key(&field) {
                if let Some(filter) = with_filter(ctx, value) {
                    query.with_filters.insert(field, filter);
                }
            }
        }

        if !opts.skip_ordering {
            if let Some(order) = &ctx.status.order {
                let sort_mode = ctx.status.sort_mode.clone().or_else(|| search.sort_mode.clone());
                query.order = Some(match sort_mode {
                    Some(mode) => {
                        let direction = ctx.status.order_direction;
                        SearchOrder::Field {
                            column: index_field_name(order),
                            mode: if direction.is_specified() {
                                direction.as_sql().to_string()
                            } else {
                                mode
                            },
                        }
                    }
                    None => {
                        let direction = ctx.status.order_direction;
                        SearchOrder::RawSql(if direction.is_specified() {
                            format!("{order} {}", direction.as_sql())
                        } else {
                            order.clone()
                        })
                    }
                });
            }
        }

        query.bounds = PageBounds {
            page: ctx.status.page,
            per_page: ctx.status.pp.or(ctx.status.per_page),
            total_entries: ctx.status.total_entries,
        };

        Ok(CompiledQuery::Search(query))
    }
}

/// Qualified filter keys map to index field names with underscores.
fn index_field_name(key: &str) -> String {
    key.replace('.', "_")
}

/// Convert one raw filter value into a "with" attribute filter.
///
/// Hash-shaped ranges become a numeric pair when the lower bound does not
/// parse as a date-time, otherwise a time pair with the upper bound
/// advanced by one day to make it inclusive. Arrays contribute their
/// first element only; scalars pass through.
fn with_filter(ctx: &CompileContext<'_>, value: &ParamValue) -> Option<WithFilter> {
    match value {
        ParamValue::Str(s) => Some(WithFilter::Scalar(s.clone())),
        ParamValue::Seq(values) => {
            if values.len() > 1 {
                debug!(?values, "multi-value search filter keeps only its first element");
            }
            values.first().map(|v| WithFilter::Scalar(v.clone()))
        }
        ParamValue::Map(m) => {
            let mut range: Vec<&str> = ["fr", "to"]
                .iter()
                .filter_map(|k| m.get(*k).and_then(ParamValue::as_str))
                .collect();
            let first = *range.first()?;
            if range.len() < 2 {
                range.push(first);
            }
            let second = range[1];
            match ctx.datetime_parser.parse(first) {
                None => Some(WithFilter::NumericRange(
                    first.parse().unwrap_or(0.0),
                    second.parse().unwrap_or(0.0),
                )),
                Some(lower) => {
                    let upper = ctx.datetime_parser.parse(second).unwrap_or(lower);
                    Some(WithFilter::TimeRange(lower, upper + Duration::days(1)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tabula_core::config::parsing::ParsingConfig;
    use tabula_core::config::DatabaseFamily;
    use tabula_core::traits::ChronoDateTimeParser;
    use tabula_core::types::OrderDirection;

    use crate::options::{GridOptions, SearchOptions};
    use crate::status::GridStatus;

    fn search_options() -> GridOptions {
        let mut options = GridOptions::default();
        options.search = Some(SearchOptions {
            search_text: Some("widgets".to_string()),
            index_names: vec!["customer_name".to_string()],
            ..SearchOptions::default()
        });
        options
    }

    fn compile(options: &GridOptions, status: &GridStatus) -> SearchQuery {
        let parser = ChronoDateTimeParser::new(&ParsingConfig::default());
        let ctx = CompileContext {
            options,
            status,
            fragments: &[],
            default_table: "orders",
            family: DatabaseFamily::Postgres,
            datetime_parser: &parser,
        };
        match SearchBackend
            .compile(&ctx, &CompileOptions::default())
            .expect("compiles")
        {
            CompiledQuery::Search(q) => q,
            CompiledQuery::Relational(_) => panic!("expected search query"),
        }
    }

    #[test]
    fn test_index_fields_route_to_conditions() {
        let options = search_options();
        let mut status = GridStatus::from_options(&options);
        status
            .filters
            .insert("customer.name".to_string(), ParamValue::from("smith"));
        let query = compile(&options, &status);
        assert_eq!(
            query.conditions.get("customer_name"),
            Some(&ParamValue::from("smith"))
        );
        assert!(query.with_filters.is_empty());
    }

    #[test]
    fn test_array_with_filter_keeps_first_element_only() {
        // Documented, if surprising, contract: multi-select values
        // collapse to their first element on the "with" path.
        let options = search_options();
        let mut status = GridStatus::from_options(&options);
        status.filters.insert(
            "region".to_string(),
            ParamValue::Seq(vec!["east".to_string(), "west".to_string()]),
        );
        let query = compile(&options, &status);
        assert_eq!(
            query.with_filters.get("region"),
            Some(&WithFilter::Scalar("east".to_string()))
        );
    }

    #[test]
    fn test_numeric_range_with_filter() {
        let options = search_options();
        let mut status = GridStatus::from_options(&options);
        status.filters.insert(
            "total".to_string(),
            ParamValue::Map(
                [
                    ("fr".to_string(), ParamValue::from("10")),
                    ("to".to_string(), ParamValue::from("20")),
                ]
                .into_iter()
                .collect(),
            ),
        );
        let query = compile(&options, &status);
        assert_eq!(
            query.with_filters.get("total"),
            Some(&WithFilter::NumericRange(10.0, 20.0))
        );
    }

    #[test]
    fn test_time_range_upper_bound_advanced_one_day() {
        let options = search_options();
        let mut status = GridStatus::from_options(&options);
        status.filters.insert(
            "created_at".to_string(),
            ParamValue::Map(
                [
                    ("fr".to_string(), ParamValue::from("2021-03-01")),
                    ("to".to_string(), ParamValue::from("2021-03-10")),
                ]
                .into_iter()
                .collect(),
            ),
        );
        let query = compile(&options, &status);
        match query.with_filters.get("created_at") {
            Some(WithFilter::TimeRange(lower, upper)) => {
                assert_eq!(lower.format("%Y-%m-%d").to_string(), "2021-03-01");
                assert_eq!(upper.format("%Y-%m-%d").to_string(), "2021-03-11");
            }
            other => panic!("unexpected filter: {other:?}"),
        }
    }

    #[test]
    fn test_single_bound_range_duplicates_itself() {
        let options = search_options();
        let mut status = GridStatus::from_options(&options);
        status.filters.insert(
            "total".to_string(),
            ParamValue::Map(
                [("fr".to_string(), ParamValue::from("15"))]
                    .into_iter()
                    .collect(),
            ),
        );
        let query = compile(&options, &status);
        assert_eq!(
            query.with_filters.get("total"),
            Some(&WithFilter::NumericRange(15.0, 15.0))
        );
    }

    #[test]
    fn test_baseline_with_filters_win() {
        let mut options = search_options();
        if let Some(search) = &mut options.search {
            search
                .with
                .insert("region".to_string(), WithFilter::Scalar("north".to_string()));
        }
        let mut status = GridStatus::from_options(&options);
        status
            .filters
            .insert("region".to_string(), ParamValue::from("south"));
        let query = compile(&options, &status);
        assert_eq!(
            query.with_filters.get("region"),
            Some(&WithFilter::Scalar("north".to_string()))
        );
    }

    #[test]
    fn test_sort_mode_vs_raw_sql_order() {
        let mut options = search_options();
        let mut status = GridStatus::from_options(&options);
        status.order = Some("customer.name".to_string());
        status.order_direction = OrderDirection::Desc;
        let query = compile(&options, &status);
        assert_eq!(
            query.order,
            Some(SearchOrder::RawSql("customer.name desc".to_string()))
        );

        if let Some(search) = &mut options.search {
            search.sort_mode = Some("extended".to_string());
        }
        let mut status = GridStatus::from_options(&options);
        status.order = Some("customer.name".to_string());
        let query = compile(&options, &status);
        assert_eq!(
            query.order,
            Some(SearchOrder::Field {
                column: "customer_name".to_string(),
                mode: "extended".to_string(),
            })
        );
    }
}
