//! Relational query compilation.

use tabula_core::types::{CompiledQuery, PageBounds, RelationalQuery};
use tabula_core::GridResult;

use crate::backend::{Backend, CompileContext};
use crate::options::{CompileOptions, CustomOrder, ExportMode};
use crate::quoting::quote_order_ident;

/// Compiles the grid status into a relational query spec: AND-combined
/// WHERE with positional binds, a quoted/templated ORDER BY, and
/// pagination bounds.
#[derive(Debug, Default)]
pub struct RelationalBackend;

impl Backend for RelationalBackend {
    fn compile(
        &self,
        ctx: &CompileContext<'_>,
        opts: &CompileOptions,
    ) -> GridResult<CompiledQuery> {
        let mut query = RelationalQuery {
            joins: ctx.options.joins.clone(),
            includes: ctx.options.includes.clone(),
            group: ctx.options.group.clone(),
            ..RelationalQuery::default()
        };

        // WHERE: baseline conditions first, then fragments in
        // declaration order.
        let mut pieces = Vec::new();
        if let Some(baseline) = &ctx.options.conditions {
            pieces.push(format!("({})", baseline.sql));
            query.binds.extend(baseline.binds.iter().cloned());
        }
        for (_, condition) in ctx.fragments {
            pieces.push(format!("({})", condition.sql));
            query.binds.extend(condition.binds.iter().cloned());
        }
        if !pieces.is_empty() {
            query.where_sql = Some(pieces.join(" AND "));
        }

        if !opts.skip_ordering {
            if let Some(order) = &ctx.status.order {
                let qualified = complete_column_name(order, ctx.default_table);
                let base = order_sql(ctx, &qualified)?;
                let direction = ctx.status.order_direction.as_sql();
                query.order_sql = Some(if direction.is_empty() {
                    base
                } else {
                    format!("{base} {direction}")
                });
            }
        }

        query.bounds = match ctx.status.export {
            ExportMode::Csv => PageBounds::unpaged(),
            ExportMode::None => PageBounds {
                page: ctx.status.page,
                per_page: ctx.status.pp.or(ctx.status.per_page),
                total_entries: ctx.status.total_entries,
            },
        };

        Ok(CompiledQuery::Relational(query))
    }
}

/// Qualify a bare column reference with the primary table name.
fn complete_column_name(order: &str, default_table: &str) -> String {
    if order.contains('.') {
        order.to_string()
    } else {
        format!("{default_table}.{order}")
    }
}

/// The ORDER BY expression for the qualified order column: the caller's
/// custom-order hook when one is declared, identifier quoting otherwise.
fn order_sql(ctx: &CompileContext<'_>, qualified: &str) -> GridResult<String> {
    match ctx.options.custom_order.get(qualified) {
        Some(CustomOrder::Template(template)) => Ok(template.replace('?', qualified)),
        Some(CustomOrder::Callable(f)) => Ok(f(qualified)),
        None => Ok(quote_order_ident(ctx.family, qualified)),
    }
}
