//! Postgres adapter for the gamereview backend.
//!
//! - [`connect_pool`] builds the shared `PgPool` from configuration.
//! - [`PgRunner`] executes statements rendered by the query builder.
//! - [`introspect`] loads the schema catalog at startup.
//! - [`reviews`] and [`demo`] hold the fixed-shape statements behind the
//!   review and demo-table routes.

use async_trait::async_trait;
use gamereview_core::{CatalogConfig, ConnectionTarget, DatabaseConfig, SslMode};
use gamereview_query::{QueryError, Statement, StatementRunner, is_plain_identifier};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Arguments, PgPool};
use std::str::FromStr;
use tracing::{debug, info, warn};

mod decode;
pub mod demo;
pub mod introspect;
pub mod reviews;

pub use decode::decode_row;
pub use demo::{DemoRename, DemoRow, DemoStore, PgDemoStore};
pub use reviews::{GameSummary, NewReview, PgReviewStore, ReviewKey, ReviewStore, ReviewUpdate};

/// Build the connection pool.
///
/// The pool connects lazily, so a server with a static catalog starts even
/// when the database is down; `/check-db-connection` then reports it. Every
/// connection resolves unqualified table names in the catalog schema.
pub fn connect_pool(db: &DatabaseConfig, catalog: &CatalogConfig) -> anyhow::Result<PgPool> {
    let mut options = connect_options(db)?;
    if !is_plain_identifier(&catalog.schema) {
        return Err(anyhow::anyhow!(
            "invalid catalog schema '{}'",
            catalog.schema
        ));
    }
    options = options.options([("search_path", catalog.schema.as_str())]);

    let pool = PgPoolOptions::new()
        .min_connections(db.pool.min_connections)
        .max_connections(db.pool.max_connections)
        .acquire_timeout(db.pool.acquire_timeout())
        .idle_timeout(db.pool.idle_timeout())
        .connect_lazy_with(options);

    info!(
        target_db = %db.redacted_target(),
        max_connections = db.pool.max_connections,
        schema = %catalog.schema,
        "connection pool configured"
    );
    Ok(pool)
}

/// Driver options for the configured target. Field-based targets never go
/// through a URL, so credentials are taken verbatim.
pub fn connect_options(db: &DatabaseConfig) -> anyhow::Result<PgConnectOptions> {
    let options = match db.target() {
        ConnectionTarget::Url(url) => PgConnectOptions::from_str(&url)?,
        ConnectionTarget::Fields {
            host,
            port,
            database,
            username,
            password,
            ssl_mode,
        } => {
            let options = PgConnectOptions::new()
                .host(&host)
                .port(port)
                .database(&database)
                .username(&username)
                .ssl_mode(pg_ssl_mode(ssl_mode));
            match password {
                Some(password) => options.password(&password),
                None => options,
            }
        }
    };
    Ok(options)
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

/// Acquire a connection and run `SELECT 1`.
pub async fn check_connection(pool: &PgPool) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "database connectivity check failed");
            false
        }
    }
}

/// Connectivity probe used by the health routes.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_connected(&self) -> bool;
}

#[async_trait]
impl Connectivity for PgPool {
    async fn is_connected(&self) -> bool {
        check_connection(self).await
    }
}

/// Runs query-builder statements on a shared pool.
#[derive(Debug, Clone)]
pub struct PgRunner {
    pool: PgPool,
}

impl PgRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn arguments(stmt: &Statement) -> Result<PgArguments, QueryError> {
        let mut args = PgArguments::default();
        // Values travel as text; the placeholder cast in the SQL picks the type.
        for value in &stmt.params {
            args.add(value.as_str().to_string())
                .map_err(|e| QueryError::Execution(e.to_string()))?;
        }
        Ok(args)
    }
}

#[async_trait]
impl StatementRunner for PgRunner {
    async fn fetch_rows(
        &self,
        stmt: &Statement,
    ) -> Result<Vec<Vec<serde_json::Value>>, QueryError> {
        let args = Self::arguments(stmt)?;
        let rows = sqlx::query_with(&stmt.sql, args)
            .fetch_all(&self.pool)
            .await
            .map_err(execution_error)?;
        debug!(rows = rows.len(), "fetched rows");
        rows.iter().map(decode_row).collect()
    }

    async fn fetch_count(&self, stmt: &Statement) -> Result<i64, QueryError> {
        let args = Self::arguments(stmt)?;
        sqlx::query_scalar_with::<_, i64, _>(&stmt.sql, args)
            .fetch_one(&self.pool)
            .await
            .map_err(execution_error)
    }
}

fn execution_error(e: sqlx::Error) -> QueryError {
    QueryError::Execution(e.to_string())
}
