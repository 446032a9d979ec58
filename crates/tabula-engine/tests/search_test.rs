//! Integration tests for the search-index backend, selected once at
//! construction by the presence of search options.

mod helpers;

use tabula_core::types::{ParamValue, RequestParams, SearchOrder, WithFilter};
use tabula_engine::{CompileOptions, GridState, SearchOptions};

use helpers::{catalog, context, options, RecordingExecutor};

fn search_options(name: &str) -> tabula_engine::GridOptions {
    let mut opts = options(name);
    opts.search = Some(SearchOptions {
        search_text: Some("widgets".to_string()),
        index_names: vec!["customers_name".to_string()],
        ..SearchOptions::default()
    });
    opts
}

#[test]
fn test_filters_split_between_conditions_and_with() {
    let ctx = context();
    let params = RequestParams::from_pairs([
        ("g[f][customers.name]", "smith"),
        ("g[f][region]", "east"),
        ("g[search_text]", "gadgets"),
    ]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    let search = query.as_search().expect("search query");
    assert_eq!(search.search_text.as_deref(), Some("gadgets"));
    assert_eq!(
        search.conditions.get("customers_name"),
        Some(&ParamValue::from("smith"))
    );
    assert_eq!(
        search.with_filters.get("region"),
        Some(&WithFilter::Scalar("east".to_string()))
    );
}

#[test]
fn test_multi_value_filter_collapses_to_first_element() {
    let ctx = context();
    let params = RequestParams::from_pairs([
        ("g[f][region][]", "east"),
        ("g[f][region][]", "west"),
    ]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    let search = query.as_search().expect("search query");
    assert_eq!(
        search.with_filters.get("region"),
        Some(&WithFilter::Scalar("east".to_string()))
    );
}

#[test]
fn test_date_range_filter_becomes_inclusive_time_pair() {
    let ctx = context();
    let params = RequestParams::from_pairs([
        ("g[f][placed_on][fr]", "2021-03-01"),
        ("g[f][placed_on][to]", "2021-03-10"),
    ]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    let search = query.as_search().expect("search query");
    match search.with_filters.get("placed_on") {
        Some(WithFilter::TimeRange(lower, upper)) => {
            assert_eq!(lower.format("%Y-%m-%d").to_string(), "2021-03-01");
            // Upper bound advances a day so the last day is included.
            assert_eq!(upper.format("%Y-%m-%d").to_string(), "2021-03-11");
        }
        other => panic!("unexpected filter: {other:?}"),
    }
}

#[test]
fn test_numeric_range_filter() {
    let ctx = context();
    let params = RequestParams::from_pairs([
        ("g[f][total][fr]", "10.5"),
        ("g[f][total][to]", "20"),
    ]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    let search = query.as_search().expect("search query");
    assert_eq!(
        search.with_filters.get("total"),
        Some(&WithFilter::NumericRange(10.5, 20.0))
    );
}

#[test]
fn test_order_with_and_without_sort_mode() {
    let ctx = context();
    let params = RequestParams::from_pairs([
        ("g[order]", "customers.name"),
        ("g[order_direction]", "desc"),
    ]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    assert_eq!(
        query.as_search().expect("search query").order,
        Some(SearchOrder::RawSql("customers.name desc".to_string()))
    );

    let mut opts = search_options("g");
    if let Some(search) = &mut opts.search {
        search.sort_mode = Some("extended".to_string());
    }
    let params = RequestParams::from_pairs([("g[order]", "customers.name")]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        opts,
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    let query = state.compile(&CompileOptions::default()).expect("compiles");
    assert_eq!(
        query.as_search().expect("search query").order,
        Some(SearchOrder::Field {
            column: "customers_name".to_string(),
            mode: "extended".to_string(),
        })
    );
}

#[test]
fn test_search_filters_survive_compilation_without_declarations() {
    // The relational path clears filters no declared column consumed;
    // search filters pass straight through and must round-trip intact.
    let ctx = context();
    let params = RequestParams::from_pairs([("g[f][region]", "east")]);
    let mut state = GridState::new(
        &ctx,
        catalog(),
        search_options("g"),
        &params,
        RecordingExecutor::default(),
        None,
    )
    .expect("grid constructs");
    state.compile(&CompileOptions::default()).expect("compiles");
    assert_eq!(
        state.state_as_parameter_pairs(false),
        vec![("g[f][region]".to_string(), "east".to_string())]
    );
}
