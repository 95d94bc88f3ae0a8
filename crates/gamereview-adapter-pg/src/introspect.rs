use gamereview_core::{CatalogConfig, ColumnKind, TableDescriptor};
use gamereview_query::{SchemaCatalog, is_plain_identifier};
use sqlx::{PgPool, Row};
use tracing::{info, warn};

/// Load the schema catalog.
///
/// A static table list in the configuration is used as-is. Otherwise the
/// base tables of the configured schema are read from `information_schema`,
/// filtered through the include/exclude lists, with columns in ordinal order.
pub async fn load_catalog(pool: &PgPool, config: &CatalogConfig) -> anyhow::Result<SchemaCatalog> {
    if config.is_static() {
        let catalog = SchemaCatalog::new(config.tables.clone())?;
        info!(tables = catalog.len(), "using static catalog");
        return Ok(catalog);
    }

    let tables = introspect_tables(pool, config).await?;
    let catalog = SchemaCatalog::new(tables)?;
    info!(
        tables = catalog.len(),
        schema = %config.schema,
        "catalog loaded from information_schema"
    );
    Ok(catalog)
}

/// Read whitelisted tables and their columns for one schema.
pub async fn introspect_tables(
    pool: &PgPool,
    config: &CatalogConfig,
) -> anyhow::Result<Vec<TableDescriptor>> {
    let table_rows = sqlx::query(
        r#"
        select table_name
        from information_schema.tables
        where table_type = 'BASE TABLE'
          and table_schema = $1
        order by table_name
        "#,
    )
    .bind(&config.schema)
    .fetch_all(pool)
    .await?;

    let mut tables = Vec::new();
    for row in table_rows {
        let table_name: String = row.try_get("table_name")?;
        if !config.admits(&table_name) {
            continue;
        }
        if !is_plain_identifier(&table_name) {
            warn!(table = %table_name, "skipping table with non-plain identifier");
            continue;
        }

        let col_rows = sqlx::query(
            r#"
            select column_name, data_type
            from information_schema.columns
            where table_schema = $1 and table_name = $2
            order by ordinal_position
            "#,
        )
        .bind(&config.schema)
        .bind(&table_name)
        .fetch_all(pool)
        .await?;

        let mut table = TableDescriptor::new(&table_name);
        for c in col_rows {
            let column_name: String = c.try_get("column_name")?;
            let data_type: String = c.try_get("data_type")?;
            if !is_plain_identifier(&column_name) {
                warn!(
                    table = %table_name,
                    column = %column_name,
                    "skipping column with non-plain identifier"
                );
                continue;
            }
            table = table.with_column(column_name, ColumnKind::from_sql_type(&data_type));
        }

        if table.columns.is_empty() {
            warn!(table = %table_name, "skipping table without usable columns");
            continue;
        }
        tables.push(table);
    }
    Ok(tables)
}
