//! The schema catalog: the single source of truth for which identifiers may
//! be interpolated into SQL text.
//!
//! The catalog is loaded once at process start and never mutated, so it is
//! shared across requests behind an `Arc` without any locking.

use crate::error::QueryError;
use crate::filter::{FilterClause, Operator, RawFilter};
use crate::request::{ColumnSelection, ProjectionRequest};
use gamereview_core::{ColumnDescriptor, TableDescriptor};
use std::collections::{BTreeMap, HashSet};

/// Immutable whitelist of tables and their columns.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, TableDescriptor>,
}

impl SchemaCatalog {
    /// Build a catalog from table descriptors.
    ///
    /// Fails on duplicate table names, duplicate column names within a table,
    /// tables without columns, and identifiers that are not plain
    /// `[A-Za-z0-9_$]` names.
    pub fn new(tables: impl IntoIterator<Item = TableDescriptor>) -> Result<Self, QueryError> {
        let mut map = BTreeMap::new();
        for table in tables {
            validate_table(&table)?;
            if map.contains_key(&table.name) {
                return Err(QueryError::InvalidCatalog(format!(
                    "table '{}' defined more than once",
                    table.name
                )));
            }
            map.insert(table.name.clone(), table);
        }
        Ok(Self { tables: map })
    }

    /// All whitelisted table names, ordered by name.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Look up a table by exact, case-sensitive name.
    pub fn describe_table(&self, name: &str) -> Result<&TableDescriptor, QueryError> {
        self.tables
            .get(name)
            .ok_or_else(|| QueryError::UnknownTable {
                table: name.to_string(),
            })
    }

    /// Resolve requested column names against a table, preserving the caller's order.
    ///
    /// An empty request is an error, never an implicit "select everything".
    pub fn resolve_columns<S: AsRef<str>>(
        &self,
        table: &str,
        requested: &[S],
    ) -> Result<Vec<ColumnDescriptor>, QueryError> {
        let descriptor = self.describe_table(table)?;
        if requested.is_empty() {
            return Err(QueryError::EmptyProjection {
                table: descriptor.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(requested.len());
        for name in requested {
            let name = name.as_ref();
            let column = descriptor
                .column(name)
                .ok_or_else(|| QueryError::UnknownColumn {
                    table: descriptor.name.clone(),
                    column: name.to_string(),
                })?;
            if !seen.insert(name) {
                return Err(QueryError::DuplicateColumn {
                    table: descriptor.name.clone(),
                    column: name.to_string(),
                });
            }
            resolved.push(column.clone());
        }
        Ok(resolved)
    }

    /// Resolve a column selection; `*` expands to all columns in schema order.
    pub fn resolve_selection(
        &self,
        table: &str,
        selection: &ColumnSelection,
    ) -> Result<Vec<ColumnDescriptor>, QueryError> {
        match selection {
            ColumnSelection::All => Ok(self.describe_table(table)?.columns.clone()),
            ColumnSelection::Named(names) => self.resolve_columns(table, names.as_slice()),
        }
    }

    /// Accept only `=, <, >, <=, >=`.
    pub fn resolve_operator(&self, token: &str) -> Result<Operator, QueryError> {
        Operator::from_token(token)
    }

    /// Validate a raw filter against a table.
    pub fn resolve_filter(&self, table: &str, raw: &RawFilter) -> Result<FilterClause, QueryError> {
        let descriptor = self.describe_table(table)?;
        let column = descriptor
            .column(&raw.column)
            .ok_or_else(|| QueryError::UnknownColumn {
                table: descriptor.name.clone(),
                column: raw.column.clone(),
            })?;
        let operator = self.resolve_operator(&raw.operator)?;
        FilterClause::new(column.clone(), operator, &raw.literal)
    }

    /// Validate a whole request: table, projection and every filter.
    pub fn projection(
        &self,
        table: &str,
        selection: &ColumnSelection,
        filters: &[RawFilter],
    ) -> Result<ProjectionRequest, QueryError> {
        let descriptor = self.describe_table(table)?;
        let columns = self.resolve_selection(table, selection)?;
        let filters = filters
            .iter()
            .map(|raw| self.resolve_filter(table, raw))
            .collect::<Result<Vec<_>, _>>()?;
        ProjectionRequest::new(descriptor.clone(), columns, filters)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate table descriptors in name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }
}

/// Identifier shape accepted into the catalog.
pub fn is_plain_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.chars().all(is_identifier_char)
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn validate_table(table: &TableDescriptor) -> Result<(), QueryError> {
    if !is_plain_identifier(&table.name) {
        return Err(QueryError::InvalidCatalog(format!(
            "invalid table identifier '{}'",
            table.name
        )));
    }
    if table.columns.is_empty() {
        return Err(QueryError::InvalidCatalog(format!(
            "table '{}' has no columns",
            table.name
        )));
    }
    let mut seen = HashSet::new();
    for col in &table.columns {
        if !is_plain_identifier(&col.name) {
            return Err(QueryError::InvalidCatalog(format!(
                "invalid column identifier '{}' on table '{}'",
                col.name, table.name
            )));
        }
        if !seen.insert(col.name.as_str()) {
            return Err(QueryError::InvalidCatalog(format!(
                "column '{}' defined more than once on table '{}'",
                col.name, table.name
            )));
        }
    }
    Ok(())
}
