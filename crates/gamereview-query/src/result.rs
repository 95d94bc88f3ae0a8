use crate::error::QueryError;
use serde::Serialize;

/// Rows returned by a projection, positionally aligned with `columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ResultSet {
    /// Assemble a result set, rejecting rows whose width differs from the column list.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<serde_json::Value>>,
    ) -> Result<Self, QueryError> {
        if let Some(row) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(QueryError::Execution(format!(
                "row has {} values but {} columns were selected",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
