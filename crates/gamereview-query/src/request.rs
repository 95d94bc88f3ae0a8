//! Validated projection requests.

use crate::error::QueryError;
use crate::filter::FilterClause;
use gamereview_core::{ColumnDescriptor, TableDescriptor};
use std::collections::HashSet;

/// Which columns a client asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Explicit `*`: every column of the table, in schema order.
    All,
    /// Named columns, in the caller's order.
    Named(Vec<String>),
}

impl ColumnSelection {
    /// Parse a comma-separated column parameter. A lone `*` selects everything;
    /// an empty parameter yields an empty named list (rejected later).
    pub fn parse(text: &str) -> Self {
        if text.trim() == "*" {
            return ColumnSelection::All;
        }
        ColumnSelection::Named(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

/// A request that has passed catalog validation.
///
/// The only way to obtain one is [`SchemaCatalog::projection`], so holding a
/// value means the table, every column and every filter are known-safe.
///
/// [`SchemaCatalog::projection`]: crate::SchemaCatalog::projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRequest {
    table: TableDescriptor,
    columns: Vec<ColumnDescriptor>,
    filters: Vec<FilterClause>,
}

impl ProjectionRequest {
    /// Validate and assemble a request. `table` must come from the catalog.
    pub(crate) fn new(
        table: TableDescriptor,
        columns: Vec<ColumnDescriptor>,
        filters: Vec<FilterClause>,
    ) -> Result<Self, QueryError> {
        if columns.is_empty() {
            return Err(QueryError::EmptyProjection {
                table: table.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for col in &columns {
            if table.column(&col.name) != Some(col) {
                return Err(QueryError::UnknownColumn {
                    table: table.name.clone(),
                    column: col.name.clone(),
                });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(QueryError::DuplicateColumn {
                    table: table.name.clone(),
                    column: col.name.clone(),
                });
            }
        }

        for filter in &filters {
            if table.column(&filter.column().name) != Some(filter.column()) {
                return Err(QueryError::UnknownColumn {
                    table: table.name.clone(),
                    column: filter.column().name.clone(),
                });
            }
        }

        Ok(Self {
            table,
            columns,
            filters,
        })
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn filters(&self) -> &[FilterClause] {
        &self.filters
    }

    /// Requested column names, in request order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
