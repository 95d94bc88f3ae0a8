//! The `DEMOTABLE` scaffolding table.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info};

/// A row to insert into the demo table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoRow {
    pub id: i64,
    pub name: String,
}

/// Rename request for the demo table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRename {
    pub old_name: String,
    pub new_name: String,
}

#[async_trait]
pub trait DemoStore: Send + Sync {
    /// Drop the demo table if present and create it empty.
    async fn initiate(&self) -> anyhow::Result<()>;

    async fn insert(&self, row: &DemoRow) -> anyhow::Result<bool>;

    /// Rename every row named `old_name`. `Ok(false)` when none matched.
    async fn rename(&self, rename: &DemoRename) -> anyhow::Result<bool>;

    async fn count(&self) -> anyhow::Result<i64>;
}

#[derive(Debug, Clone)]
pub struct PgDemoStore {
    pool: PgPool,
}

impl PgDemoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DemoStore for PgDemoStore {
    async fn initiate(&self) -> anyhow::Result<()> {
        sqlx::query("DROP TABLE IF EXISTS DEMOTABLE")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE TABLE DEMOTABLE (id integer PRIMARY KEY, name varchar(20))")
            .execute(&self.pool)
            .await?;
        info!("demo table recreated");
        Ok(())
    }

    async fn insert(&self, row: &DemoRow) -> anyhow::Result<bool> {
        let result = sqlx::query("INSERT INTO DEMOTABLE (id, name) VALUES ($1, $2)")
            .bind(row.id)
            .bind(&row.name)
            .execute(&self.pool)
            .await?;
        debug!(id = row.id, "demo row inserted");
        Ok(result.rows_affected() > 0)
    }

    async fn rename(&self, rename: &DemoRename) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE DEMOTABLE SET name = $1 WHERE name = $2")
            .bind(&rename.new_name)
            .bind(&rename.old_name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM DEMOTABLE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
