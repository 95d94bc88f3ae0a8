//! Rendering validated requests into parameterized SQL.
//!
//! Only catalog-validated identifiers ever reach the SQL text. Every filter
//! literal becomes a positional placeholder (`$1`, `$2`, ...) and travels
//! separately in [`Statement::params`].

use crate::filter::BoundValue;
use crate::request::ProjectionRequest;
use gamereview_core::{ColumnKind, TableDescriptor};

/// A statement template plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text containing only validated identifiers and placeholders.
    pub sql: String,
    /// Values for `$1..$n`.
    pub params: Vec<BoundValue>,
    /// Output column names, positionally aligned with the SELECT list.
    pub columns: Vec<String>,
}

/// Double-quote an identifier. Catalog identifiers are already restricted to
/// plain names; quoting keeps mixed-case names intact under case folding.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Render a projection query bounded by `max_rows`.
pub fn render_projection(request: &ProjectionRequest, max_rows: u64) -> Statement {
    let select_list = request
        .columns()
        .iter()
        .map(|c| match c.kind {
            // Any type the catalog folded into TEXT comes back as its text form
            ColumnKind::Text => format!("{0}::text AS {0}", quote_ident(&c.name)),
            ColumnKind::Numeric | ColumnKind::Date => quote_ident(&c.name),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "SELECT {} FROM {}",
        select_list,
        quote_ident(&request.table().name)
    );

    let mut params = Vec::with_capacity(request.filters().len());
    let mut where_parts = Vec::with_capacity(request.filters().len());
    for (i, filter) in request.filters().iter().enumerate() {
        let column = filter.column();
        // TEXT columns compare on their text form so any underlying type works
        let lhs = match column.kind {
            ColumnKind::Text => format!("{}::text", quote_ident(&column.name)),
            ColumnKind::Numeric | ColumnKind::Date => quote_ident(&column.name),
        };
        where_parts.push(format!(
            "{} {} ${}::{}",
            lhs,
            filter.operator().as_sql(),
            i + 1,
            filter.value().sql_cast()
        ));
        params.push(filter.value().clone());
    }

    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    sql.push_str(&format!(" LIMIT {}", max_rows));

    Statement {
        sql,
        params,
        columns: request.column_names(),
    }
}

/// Render `SELECT COUNT(*)` over a whole table. Callers resolve `table`
/// through the catalog first.
pub(crate) fn render_count(table: &TableDescriptor) -> Statement {
    Statement {
        sql: format!("SELECT COUNT(*) FROM {}", quote_ident(&table.name)),
        params: Vec::new(),
        columns: vec!["count".to_string()],
    }
}
