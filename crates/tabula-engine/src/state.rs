//! Per-request grid state and orchestration.
//!
//! A [`GridState`] is built once per request/response cycle: it merges the
//! status, accepts column declarations, compiles the query through the
//! selected backend, and executes it through the injected executor. It is
//! consulted during rendering and then discarded.

use tracing::{debug, warn};

use tabula_core::config::{DatabaseFamily, GridConfig};
use tabula_core::traits::{
    ChronoDateParser, ChronoDateTimeParser, DateParser, DateTimeParser, QueryExecutor, QueryStore,
};
use tabula_core::types::{
    Column, CompiledQuery, Condition, OrderDirection, ParamValue, RequestParams, SavedQuery,
};
use tabula_core::{GridError, GridResult};

use crate::backend::{select_backend, Backend, CompileContext};
use crate::binder::ColumnRequestBinder;
use crate::catalog::ColumnCatalog;
use crate::conditions::GeneratorRegistry;
use crate::options::{CompileOptions, ExportMode, GridOptions};
use crate::status::GridStatus;

/// Callback invoked with the records of the current page.
pub type PaginatedCallback<R> = Box<dyn Fn(&[R])>;

/// Callback invoked with a lazy producer of the full (unpaginated)
/// filtered resultset. The producer runs only if the callback calls it.
pub type ResultsetCallback<R> = Box<dyn Fn(&dyn Fn() -> GridResult<Vec<R>>)>;

/// Application-wide grid environment, built once and shared by reference
/// across grid instances. The generator registry is closed and immutable
/// after construction; per-grid customization goes through custom filters
/// and custom order hooks instead of registry mutation.
pub struct GridContext {
    generators: GeneratorRegistry,
    family: DatabaseFamily,
    date_parser: Box<dyn DateParser>,
    datetime_parser: Box<dyn DateTimeParser>,
}

impl GridContext {
    /// Build the environment from configuration, with the default
    /// format-string parsers.
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            generators: GeneratorRegistry::new(),
            family: config.database.family,
            date_parser: Box::new(ChronoDateParser::new(&config.parsing)),
            datetime_parser: Box::new(ChronoDateTimeParser::new(&config.parsing)),
        }
    }

    /// Replace the date/datetime parsers, e.g. with locale-aware ones.
    pub fn with_parsers(
        mut self,
        date_parser: Box<dyn DateParser>,
        datetime_parser: Box<dyn DateTimeParser>,
    ) -> Self {
        self.date_parser = date_parser;
        self.datetime_parser = datetime_parser;
        self
    }

    /// The engine family queries are compiled for.
    pub fn family(&self) -> DatabaseFamily {
        self.family
    }
}

/// One grid's complete per-request state.
///
/// Owns the validated options, the merged status, the accumulated
/// condition fragments in column-declaration order, the backend chosen at
/// construction, and the executor. Compilation is memoized per instance.
pub struct GridState<'a, E: QueryExecutor> {
    context: &'a GridContext,
    catalog: ColumnCatalog,
    options: GridOptions,
    status: GridStatus,
    backend: Box<dyn Backend>,
    fragments: Vec<(Column, Condition)>,
    compiled: Option<CompiledQuery>,
    executor: E,
    saved_query: Option<SavedQuery>,
    resultset: Option<Vec<E::Record>>,
    view_rendered: bool,
    paginated_callback: Option<PaginatedCallback<E::Record>>,
    resultset_callback: Option<ResultsetCallback<E::Record>>,
}

impl<'a, E: QueryExecutor> GridState<'a, E> {
    /// Construct a grid for one request.
    ///
    /// Validates the options, resolves the saved query (a `q` request
    /// parameter wins over the `saved_query` option; a lookup miss is
    /// logged and ignored), and merges the status in precedence order:
    /// configured defaults, then construction options, then the saved
    /// query, then the live request parameters.
    pub fn new(
        context: &'a GridContext,
        catalog: ColumnCatalog,
        options: GridOptions,
        params: &RequestParams,
        executor: E,
        store: Option<&dyn QueryStore>,
    ) -> GridResult<Self> {
        options.validate()?;

        let grid_params = params.grid(&options.name).cloned().unwrap_or_default();
        let requested_id = grid_params
            .get("q")
            .and_then(ParamValue::as_str)
            .and_then(|s| s.trim().parse::<i64>().ok());
        let saved_id = requested_id.or(options.saved_query);

        let mut saved_query = None;
        if let Some(id) = saved_id {
            match store {
                Some(store) => match store.find_by_id(id, &options.name)? {
                    Some(found) => saved_query = Some(found),
                    None => {
                        warn!(id, grid = %options.name, "saved query not found, ignoring")
                    }
                },
                None => {
                    warn!(id, grid = %options.name, "saved query requested but no store configured")
                }
            }
        }

        let mut status = GridStatus::from_options(&options);
        if let Some(saved) = &saved_query {
            status.apply_saved_query(&saved.status);
        }
        status.apply_request_params(&grid_params, options.enable_csv_export);

        let backend = select_backend(&options);
        Ok(Self {
            context,
            catalog,
            options,
            status,
            backend,
            fragments: Vec::new(),
            compiled: None,
            executor,
            saved_query,
            resultset: None,
            view_rendered: false,
            paginated_callback: None,
            resultset_callback: None,
        })
    }

    /// Register a callback fired with the current page's records when
    /// the grid reads its resultset.
    pub fn on_paginated_resultset(&mut self, callback: impl Fn(&[E::Record]) + 'static) {
        self.paginated_callback = Some(Box::new(callback));
    }

    /// Register a callback handed a lazy producer of the full filtered
    /// resultset. The extra query runs only if the callback invokes it.
    pub fn on_full_resultset(
        &mut self,
        callback: impl Fn(&dyn Fn() -> GridResult<Vec<E::Record>>) + 'static,
    ) {
        self.resultset_callback = Some(Box::new(callback));
    }

    /// Declare one column for filtering, in rendering order.
    ///
    /// Looks the column up in the catalog, binds it against the current
    /// filter status, and runs the matching condition generator. A filter
    /// value that produces no condition is removed from the status so it
    /// does not round-trip into links and forms. Returns the resolved
    /// column together with its table name and main-table flag.
    pub fn declare_column(
        &mut self,
        name: &str,
        table: Option<&str>,
        custom_filter: bool,
        table_alias: Option<&str>,
    ) -> GridResult<(Column, String, bool)> {
        let column = match table {
            Some(table) => self.catalog.find(table, name).cloned().ok_or_else(|| {
                GridError::configuration(format!("unknown column '{table}.{name}'"))
            }),
            None => self
                .catalog
                .find_in_default_table(name)
                .cloned()
                .ok_or_else(|| {
                    GridError::configuration(format!(
                        "column '{name}' is not present in table '{}'; if it belongs to an \
                         associated table, declare that association in joins or includes and \
                         name the table explicitly",
                        self.catalog.default_table()
                    ))
                }),
        }?;

        let binder =
            ColumnRequestBinder::new(&*self.context.date_parser, &*self.context.datetime_parser);
        if let Some(bound) = binder.bind(&column, &mut self.status.filters, table_alias, custom_filter)
        {
            let generator = if custom_filter {
                Some(self.context.generators.custom())
            } else {
                self.context.generators.for_type(&column.column_type)
            };
            let condition = match (&bound.input, generator) {
                (Some(input), Some(generator)) => generator.generate(&column, table_alias, input),
                (Some(_), None) => {
                    debug!(
                        column = %column.qualified_name(table_alias),
                        column_type = %column.column_type,
                        "no condition generator for column type, dropping filter"
                    );
                    None
                }
                (None, _) => None,
            };
            match condition {
                Some(condition) => {
                    self.compiled = None;
                    self.fragments.push((column.clone(), condition));
                }
                None => {
                    self.status.filters.remove(&bound.key);
                }
            }
        }

        let table_name = column.table.clone();
        let main_table = column.main_table;
        Ok((column, table_name, main_table))
    }

    /// Compile the grid into a backend query spec. Memoized; a
    /// `forget_generated` compile recomputes without re-arming the memo.
    pub fn compile(&mut self, opts: &CompileOptions) -> GridResult<CompiledQuery> {
        if !opts.forget_generated {
            if let Some(query) = &self.compiled {
                return Ok(query.clone());
            }
        }
        // Filters that no declared column turned into a condition have no
        // effect on the query and must not round-trip.
        if !self.options.search_mode() && self.fragments.is_empty() {
            self.status.filters.clear();
        }
        let ctx = CompileContext {
            options: &self.options,
            status: &self.status,
            fragments: &self.fragments,
            default_table: self.catalog.default_table(),
            family: self.context.family,
            datetime_parser: &*self.context.datetime_parser,
        };
        let query = self.backend.compile(&ctx, opts)?;
        if !opts.forget_generated {
            self.compiled = Some(query.clone());
        }
        Ok(query)
    }

    /// Read the current page of records, compiling first if needed.
    ///
    /// In CSV export mode pagination is skipped and every matching record
    /// is read. In all-records mode the unfiltered total is counted first
    /// and becomes the page size. The resultset is cached; registered
    /// callbacks fire exactly once, on the first read.
    pub fn read(&mut self) -> GridResult<&[E::Record]> {
        if self.resultset.is_some() {
            return Ok(self.resultset.as_deref().unwrap_or_default());
        }

        if self.status.all_records_mode() {
            let total = self.unfiltered_count()?;
            self.status.pp = Some(total);
            self.compiled = None;
        }

        let query = self.compile(&CompileOptions::default())?;
        let records = if self.status.export == ExportMode::Csv {
            self.executor.execute_all(&query)?
        } else {
            self.executor.execute_paged(&query)?
        };

        if let Some(callback) = &self.paginated_callback {
            callback(&records);
        }
        if let Some(callback) = &self.resultset_callback {
            let executor = &self.executor;
            let produce = move || executor.execute_all(&query);
            callback(&produce);
        }

        self.resultset = Some(records);
        Ok(self.resultset.as_deref().unwrap_or_default())
    }

    /// Count the matching records. Ordering is skipped and the memoized
    /// query is left untouched.
    pub fn count(&mut self) -> GridResult<u64> {
        let query = self.compile(&CompileOptions {
            skip_ordering: true,
            forget_generated: true,
        })?;
        self.executor.execute_count(&query)
    }

    /// Whether no records match the current filters.
    pub fn is_empty(&mut self) -> GridResult<bool> {
        Ok(self.count()? == 0)
    }

    /// Distinct values of a column as `(value, label)` dropdown pairs,
    /// blanks removed, deduplicated and sorted.
    pub fn distinct_values_for_column(&self, column: &Column) -> GridResult<Vec<(String, String)>> {
        let mut values: Vec<String> = self
            .executor
            .distinct_values(column)?
            .into_iter()
            .filter(|v| !v.trim().is_empty())
            .collect();
        values.sort();
        values.dedup();
        Ok(values.into_iter().map(|v| (v.clone(), v)).collect())
    }

    /// Mark rendering as finished, unlocking the post-render record
    /// accessors.
    pub fn finish_rendering(&mut self) {
        self.view_rendered = true;
    }

    /// Every record matching the current filters, across all pages.
    /// Available only after rendering has finished.
    pub fn all_pages_records(&mut self) -> GridResult<Vec<E::Record>> {
        self.ensure_rendered()?;
        let query = self.compile(&CompileOptions::default())?;
        self.executor.execute_all(&query)
    }

    /// The records of the current page. Available only after rendering
    /// has finished.
    pub fn current_page_records(&mut self) -> GridResult<&[E::Record]> {
        self.ensure_rendered()?;
        self.read()
    }

    /// Whether the grid is currently ordered by the given column. The
    /// alias must match the one the column was declared with.
    pub fn ordered_by(&self, column: &Column, table_alias: Option<&str>) -> bool {
        match &self.status.order {
            Some(order) => {
                order == &column.qualified_name(table_alias)
                    || (column.main_table && order == &column.name)
            }
            None => false,
        }
    }

    /// The current order column reference, if any.
    pub fn order(&self) -> Option<&str> {
        self.status.order.as_deref()
    }

    /// The current order direction.
    pub fn order_direction(&self) -> OrderDirection {
        self.status.order_direction
    }

    /// Whether any filter is active.
    pub fn filtering_on(&self) -> bool {
        !self.status.filters.is_empty()
    }

    /// Whether the given column has an active filter.
    pub fn filtered_by(&self, column: &Column) -> bool {
        self.filter_params(column).is_some()
    }

    /// The raw filter value for a column, if one is active.
    pub fn filter_params(&self, column: &Column) -> Option<&ParamValue> {
        self.status.filters.get(&column.filter_key(None))
    }

    /// Serialize the grid's state into request-parameter pairs, the exact
    /// inverse of parameter parsing.
    pub fn state_as_parameter_pairs(&self, include_saved_query: bool) -> Vec<(String, String)> {
        let saved_id = if include_saved_query {
            self.saved_query.as_ref().map(|q| q.id)
        } else {
            None
        };
        self.status.parameter_pairs(&self.options.name, saved_id)
    }

    /// The merged status.
    pub fn status(&self) -> &GridStatus {
        &self.status
    }

    /// The validated construction options.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The grid name, i.e. its request-parameter prefix.
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// The current export mode.
    pub fn export_mode(&self) -> ExportMode {
        self.status.export
    }

    /// The saved query in effect, if one was loaded.
    pub fn saved_query(&self) -> Option<&SavedQuery> {
        self.saved_query.as_ref()
    }

    fn ensure_rendered(&self) -> GridResult<()> {
        if self.view_rendered {
            Ok(())
        } else {
            Err(GridError::state(
                "records are not available until rendering has finished",
            ))
        }
    }

    /// Count over the baseline conditions only, ignoring filters and
    /// pagination. Used by all-records mode to size the single page.
    fn unfiltered_count(&mut self) -> GridResult<u64> {
        let mut unfiltered = self.status.clone();
        unfiltered.filters.clear();
        unfiltered.page = 1;
        unfiltered.per_page = None;
        unfiltered.pp = None;
        unfiltered.total_entries = None;
        let ctx = CompileContext {
            options: &self.options,
            status: &unfiltered,
            fragments: &[],
            default_table: self.catalog.default_table(),
            family: self.context.family,
            datetime_parser: &*self.context.datetime_parser,
        };
        let query = self.backend.compile(
            &ctx,
            &CompileOptions {
                skip_ordering: true,
                forget_generated: true,
            },
        )?;
        self.executor.execute_count(&query)
    }
}
