//! Shared test infrastructure for the Postgres end-to-end tests.
//!
//! This module provides:
//! - Docker container management for PostgreSQL
//! - The review database fixture
//! - Builders for the catalog and query builder under test

use gamereview_adapter_pg::{PgRunner, introspect};
use gamereview_core::{CatalogConfig, QueryConfig};
use gamereview_query::{ColumnSelection, QueryBuilder, ResultSet, SchemaCatalog, parse_filters};
use sqlx::PgPool;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// DOCKER CONTAINER CONFIGURATION
// =============================================================================

pub const CONTAINER_NAME: &str = "gamereview_test_postgres";
pub const POSTGRES_PORT: u16 = 5433;
pub const POSTGRES_PASSWORD: &str = "gamereview_test_password";
pub const DATABASE_NAME: &str = "gamereview_test";

pub fn database_url() -> String {
    format!(
        "postgres://postgres:{}@localhost:{}/{}",
        POSTGRES_PASSWORD, POSTGRES_PORT, DATABASE_NAME
    )
}

// =============================================================================
// DOCKER CONTAINER MANAGEMENT
// =============================================================================

/// Start a PostgreSQL container for testing
pub fn start_postgres_container() -> Result<(), String> {
    let output = Command::new("docker")
        .args(["ps", "-a", "-q", "-f", &format!("name={}", CONTAINER_NAME)])
        .output()
        .map_err(|e| format!("Failed to check existing container: {}", e))?;

    if !String::from_utf8_lossy(&output.stdout).trim().is_empty() {
        let _ = Command::new("docker")
            .args(["rm", "-f", CONTAINER_NAME])
            .output();
    }

    let status = Command::new("docker")
        .args([
            "run",
            "-d",
            "--name",
            CONTAINER_NAME,
            "-e",
            &format!("POSTGRES_PASSWORD={}", POSTGRES_PASSWORD),
            "-e",
            &format!("POSTGRES_DB={}", DATABASE_NAME),
            "-p",
            &format!("{}:5432", POSTGRES_PORT),
            "postgres:16-alpine",
        ])
        .status()
        .map_err(|e| format!("Failed to start container: {}", e))?;

    if !status.success() {
        return Err("Failed to start PostgreSQL container".to_string());
    }
    Ok(())
}

/// Stop and remove the PostgreSQL container
pub fn stop_postgres_container() {
    let _ = Command::new("docker")
        .args(["rm", "-f", CONTAINER_NAME])
        .output();
}

/// Wait for PostgreSQL to be ready
pub async fn wait_for_postgres() -> Result<PgPool, String> {
    for attempt in 1..=30 {
        match PgPool::connect(&database_url()).await {
            Ok(pool) => {
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    println!("✅ PostgreSQL ready after {} attempts", attempt);
                    return Ok(pool);
                }
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    println!("⏳ Waiting for PostgreSQL... (attempt {})", attempt);
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Err("PostgreSQL did not become ready in time".to_string())
}

// =============================================================================
// DATABASE INITIALIZATION
// =============================================================================

const SCHEMA_SQL: &str = r#"
CREATE TABLE Game (
    game_id integer PRIMARY KEY,
    game_name varchar(50) NOT NULL,
    release_date date
);

CREATE TABLE Genre (
    genre_name varchar(30) PRIMARY KEY
);

CREATE TABLE inGenre (
    game_id integer REFERENCES Game (game_id),
    genre_name varchar(30) REFERENCES Genre (genre_name),
    PRIMARY KEY (game_id, genre_name)
);

CREATE TABLE GameReview (
    game_id integer REFERENCES Game (game_id),
    author varchar(30),
    rev_desc varchar(200),
    score integer,
    PRIMARY KEY (author, game_id)
);

CREATE TABLE Empty_Table (
    id integer
);

CREATE TABLE Platform (
    platform_id uuid PRIMARY KEY,
    name varchar(30) NOT NULL,
    support_window interval
);
"#;

const SEED_SQL: &str = r#"
INSERT INTO Game VALUES (1, 'Chess', '1990-01-01'), (2, 'Go', '2001-06-15');
INSERT INTO Genre VALUES ('Strategy'), ('Board'), ('Abstract');
INSERT INTO inGenre VALUES
    (1, 'Strategy'), (1, 'Board'),
    (2, 'Strategy'), (2, 'Board'), (2, 'Abstract');
INSERT INTO GameReview VALUES (1, 'ann', 'classic', 9), (2, 'bob', 'deep', 10);
INSERT INTO Platform VALUES
    ('6f1c2b9e-3d4a-4f5b-8c7d-0e1f2a3b4c5d', 'Arcade', '5 years'),
    ('a0b1c2d3-e4f5-4a6b-9c8d-7e6f5a4b3c2d', 'Handheld', NULL);
"#;

pub async fn initialize_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    sqlx::raw_sql(SEED_SQL).execute(pool).await?;
    println!("✅ Database initialized with schema and seed data");
    Ok(())
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    pub async fn setup() -> Result<Self, String> {
        start_postgres_container()?;
        let pool = wait_for_postgres().await?;
        initialize_database(&pool)
            .await
            .map_err(|e| format!("Failed to initialize database: {}", e))?;
        Ok(Self { pool })
    }

    pub async fn catalog(&self) -> SchemaCatalog {
        self.catalog_with(&CatalogConfig::default()).await
    }

    pub async fn catalog_with(&self, config: &CatalogConfig) -> SchemaCatalog {
        introspect::load_catalog(&self.pool, config)
            .await
            .expect("catalog should load")
    }

    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::new(
            Arc::new(PgRunner::new(self.pool.clone())),
            &QueryConfig::default(),
        )
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        stop_postgres_container();
        println!("🧹 Cleaned up PostgreSQL container");
    }
}

// =============================================================================
// QUERY HELPERS
// =============================================================================

/// Validate and run a table query the way the HTTP route does.
pub async fn table_query(
    catalog: &SchemaCatalog,
    builder: &QueryBuilder,
    table: &str,
    columns: &str,
    filters: &str,
) -> ResultSet {
    let filters = parse_filters(filters).expect("filters should parse");
    let request = catalog
        .projection(table, &ColumnSelection::parse(columns), &filters)
        .expect("request should validate");
    builder.run(&request).await.expect("query should execute")
}
