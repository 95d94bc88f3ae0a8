use crate::error::QueryError;
use crate::statement::Statement;
use async_trait::async_trait;

/// Executes rendered statements against a database.
///
/// Implementations bind [`Statement::params`] positionally and must never
/// interpolate them into the SQL text.
#[async_trait]
pub trait StatementRunner: Send + Sync {
    /// Run a row-returning statement. Each row holds one JSON scalar per
    /// output column, in SELECT-list order.
    async fn fetch_rows(&self, stmt: &Statement) -> Result<Vec<Vec<serde_json::Value>>, QueryError>;

    /// Run a statement returning a single integer.
    async fn fetch_count(&self, stmt: &Statement) -> Result<i64, QueryError>;
}
