//! Query builder: renders validated requests and runs them through a
//! [`StatementRunner`] with a bounded execution time.

use crate::catalog::SchemaCatalog;
use crate::error::QueryError;
use crate::request::ProjectionRequest;
use crate::result::ResultSet;
use crate::runner::StatementRunner;
use crate::statement::{self, Statement};
use gamereview_core::QueryConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Builds and executes catalog-validated queries.
///
/// Cheap to clone; holds no per-request state, so a single instance is
/// shared by every request handler.
#[derive(Clone)]
pub struct QueryBuilder {
    runner: Arc<dyn StatementRunner>,
    max_rows: u64,
    timeout: Duration,
}

impl QueryBuilder {
    pub fn new(runner: Arc<dyn StatementRunner>, config: &QueryConfig) -> Self {
        Self {
            runner,
            max_rows: config.max_rows,
            timeout: config.execute_timeout(),
        }
    }

    pub fn max_rows(&self) -> u64 {
        self.max_rows
    }

    /// Render a validated request. All validation already happened when the
    /// request was constructed, so rendering cannot fail.
    pub fn build(&self, request: &ProjectionRequest) -> Statement {
        statement::render_projection(request, self.max_rows)
    }

    /// Execute a rendered projection statement.
    pub async fn execute(&self, stmt: &Statement) -> Result<ResultSet, QueryError> {
        let rows = self.bounded(stmt, self.runner.fetch_rows(stmt)).await?;
        ResultSet::new(stmt.columns.clone(), rows)
    }

    /// Build and execute in one step.
    pub async fn run(&self, request: &ProjectionRequest) -> Result<ResultSet, QueryError> {
        let stmt = self.build(request);
        self.execute(&stmt).await
    }

    /// Number of rows currently in a whitelisted table.
    pub async fn count_rows(
        &self,
        catalog: &SchemaCatalog,
        table: &str,
    ) -> Result<i64, QueryError> {
        let stmt = statement::render_count(catalog.describe_table(table)?);
        self.bounded(&stmt, self.runner.fetch_count(&stmt)).await
    }

    async fn bounded<T>(
        &self,
        stmt: &Statement,
        fut: impl Future<Output = Result<T, QueryError>>,
    ) -> Result<T, QueryError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        let started = Instant::now();

        // Dropping the runner future on timeout releases its pooled connection.
        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Execution(format!(
                "statement timed out after {} ms",
                self.timeout.as_millis()
            ))),
        };

        match &result {
            Ok(_) => debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "statement completed"
            ),
            Err(e) => error!(sql = %stmt.sql, error = %e, "statement failed"),
        }
        result
    }
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("max_rows", &self.max_rows)
            .field("timeout", &self.timeout)
            .finish()
    }
}
