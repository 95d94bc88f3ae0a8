//! Table and column descriptors.
//!
//! These types describe the whitelist of identifiers that may appear in
//! generated SQL text. They are built once at process start (from
//! introspection or static configuration) and are immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse column type used to pick literal coercion and placeholder casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnKind {
    Numeric,
    Text,
    Date,
}

impl ColumnKind {
    /// Classify a SQL data type name as reported by `information_schema.columns`.
    ///
    /// Type modifiers such as `numeric(10,2)` or `character varying(20)` are ignored.
    pub fn from_sql_type(data_type: &str) -> Self {
        let dt = data_type.trim().to_lowercase();
        let base = dt.split('(').next().unwrap_or_default().trim();

        match base {
            "smallint" | "integer" | "int" | "int2" | "int4" | "int8" | "bigint" | "numeric"
            | "decimal" | "real" | "float4" | "float8" | "double precision" | "smallserial"
            | "serial" | "bigserial" | "number" => ColumnKind::Numeric,
            "date" | "timestamp" | "timestamptz" => ColumnKind::Date,
            _ if base.starts_with("timestamp") => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "NUMERIC",
            ColumnKind::Text => "TEXT",
            ColumnKind::Date => "DATE",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whitelisted column of a whitelisted table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, exactly as stored in the database.
    pub name: String,

    /// Coarse type of the column.
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A whitelisted table and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name, exactly as stored in the database.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Create a table descriptor with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder-style column append, keeps declaration order.
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnDescriptor::new(name, kind));
        self
    }

    /// Get a column by exact (case-sensitive) name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
