//! Error types for the query crate.

use thiserror::Error;

/// Errors raised while validating or executing a table query.
///
/// Every variant except [`QueryError::Execution`] is a client input failure
/// detected before any database call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Table name is not in the catalog.
    #[error("unknown table '{table}'")]
    UnknownTable { table: String },

    /// Column name is not a column of the table.
    #[error("unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// No columns were requested.
    #[error("no columns requested from table '{table}'")]
    EmptyProjection { table: String },

    /// The same column was requested twice.
    #[error("column '{column}' requested more than once from table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Comparison operator outside `=, <, >, <=, >=`.
    #[error("unsupported operator '{token}'")]
    UnsupportedOperator { token: String },

    /// Literal cannot be coerced to the column's kind.
    #[error("invalid literal '{literal}' for {kind} column '{column}'")]
    InvalidLiteral {
        column: String,
        kind: String,
        literal: String,
    },

    /// Filter clause is not of the form `<column><op><literal>`.
    #[error("malformed filter '{clause}': {reason}")]
    MalformedFilter { clause: String, reason: String },

    /// Catalog definition is inconsistent (raised at startup, not per request).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// The database rejected or failed the statement.
    #[error("execution failed: {0}")]
    Execution(String),
}

impl QueryError {
    /// Stable tag naming the error kind, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::UnknownTable { .. } => "UnknownTable",
            QueryError::UnknownColumn { .. } => "UnknownColumn",
            QueryError::EmptyProjection { .. } => "EmptyProjection",
            QueryError::DuplicateColumn { .. } => "DuplicateColumn",
            QueryError::UnsupportedOperator { .. } => "UnsupportedOperator",
            QueryError::InvalidLiteral { .. } => "InvalidLiteral",
            QueryError::MalformedFilter { .. } => "MalformedFilter",
            QueryError::InvalidCatalog(_) => "InvalidCatalog",
            QueryError::Execution(_) => "ExecutionError",
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            QueryError::Execution(_) | QueryError::InvalidCatalog(_)
        )
    }
}
