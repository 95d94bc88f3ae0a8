//! Table-query tests against a live database.

use super::common::*;
use gamereview_core::{CatalogConfig, ColumnKind};
use gamereview_query::{ColumnSelection, QueryError, parse_filters};
use serde_json::json;

// =============================================================================
// CATALOG
// =============================================================================

pub async fn test_introspected_catalog(ctx: &TestContext) {
    println!("  🧪 test_introspected_catalog");

    let catalog = ctx.catalog().await;
    assert_eq!(
        catalog.list_tables(),
        vec!["empty_table", "game", "gamereview", "genre", "ingenre", "platform"]
    );

    let game = catalog.describe_table("game").unwrap();
    assert_eq!(
        game.column_names(),
        vec!["game_id", "game_name", "release_date"]
    );
    assert_eq!(game.column("game_id").unwrap().kind, ColumnKind::Numeric);
    assert_eq!(game.column("game_name").unwrap().kind, ColumnKind::Text);
    assert_eq!(game.column("release_date").unwrap().kind, ColumnKind::Date);

    let platform = catalog.describe_table("platform").unwrap();
    assert_eq!(platform.column("platform_id").unwrap().kind, ColumnKind::Text);
    assert_eq!(platform.column("support_window").unwrap().kind, ColumnKind::Text);

    println!("     ✓ Tables and column kinds introspected");
}

pub async fn test_catalog_include_exclude(ctx: &TestContext) {
    println!("  🧪 test_catalog_include_exclude");

    let config = CatalogConfig {
        exclude: vec!["gamereview".to_string()],
        ..Default::default()
    };
    let catalog = ctx.catalog_with(&config).await;
    assert!(matches!(
        catalog.describe_table("gamereview"),
        Err(QueryError::UnknownTable { .. })
    ));

    let config = CatalogConfig {
        include: vec!["game".to_string()],
        ..Default::default()
    };
    assert_eq!(ctx.catalog_with(&config).await.list_tables(), vec!["game"]);

    println!("     ✓ Include/exclude lists applied");
}

// =============================================================================
// PROJECTIONS AND FILTERS
// =============================================================================

pub async fn test_projection_with_numeric_filter(ctx: &TestContext) {
    println!("  🧪 test_projection_with_numeric_filter");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();
    let rs = table_query(&catalog, &builder, "game", "game_id,game_name", "game_id>1").await;
    assert_eq!(rs.columns, vec!["game_id", "game_name"]);
    assert_eq!(rs.rows, vec![vec![json!(2), json!("Go")]]);

    println!("     ✓ game_id>1 returned only Go");
}

pub async fn test_date_and_text_filters(ctx: &TestContext) {
    println!("  🧪 test_date_and_text_filters");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();

    let rs = table_query(
        &catalog,
        &builder,
        "game",
        "game_name,release_date",
        "release_date>=2000-01-01",
    )
    .await;
    assert_eq!(rs.rows, vec![vec![json!("Go"), json!("2001-06-15")]]);

    let rs = table_query(&catalog, &builder, "game", "game_id", "game_name<D").await;
    assert_eq!(rs.rows, vec![vec![json!(1)]]);

    let rs = table_query(&catalog, &builder, "gamereview", "*", "score>=10").await;
    assert_eq!(rs.columns, vec!["game_id", "author", "rev_desc", "score"]);
    assert_eq!(rs.rows, vec![vec![json!(2), json!("bob"), json!("deep"), json!(10)]]);

    println!("     ✓ DATE and TEXT comparisons bound correctly");
}

pub async fn test_unmapped_types_project_as_text(ctx: &TestContext) {
    println!("  🧪 test_unmapped_types_project_as_text");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();
    let rs = table_query(
        &catalog,
        &builder,
        "platform",
        "platform_id,name,support_window",
        "name=Arcade",
    )
    .await;
    assert_eq!(
        rs.rows,
        vec![vec![
            json!("6f1c2b9e-3d4a-4f5b-8c7d-0e1f2a3b4c5d"),
            json!("Arcade"),
            json!("5 years"),
        ]]
    );

    let rs = table_query(
        &catalog,
        &builder,
        "platform",
        "name,support_window",
        "platform_id=a0b1c2d3-e4f5-4a6b-9c8d-7e6f5a4b3c2d",
    )
    .await;
    assert_eq!(rs.rows, vec![vec![json!("Handheld"), json!(null)]]);

    println!("     ✓ uuid and interval columns came back as text");
}

pub async fn test_injection_literals_are_data(ctx: &TestContext) {
    println!("  🧪 test_injection_literals_are_data");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();
    for literal in ["'; DROP TABLE game;--", "x' OR '1'='1", "O'Brien"] {
        let rs = table_query(
            &catalog,
            &builder,
            "game",
            "game_id",
            &format!("game_name={}", literal),
        )
        .await;
        assert!(rs.rows.is_empty(), "literal matched rows: {}", literal);
    }

    assert_eq!(builder.count_rows(&catalog, "game").await.unwrap(), 2);

    println!("     ✓ Hostile literals matched nothing and the table survived");
}

pub async fn test_invalid_requests_never_reach_database(ctx: &TestContext) {
    println!("  🧪 test_invalid_requests_never_reach_database");

    let catalog = ctx.catalog().await;
    let err = catalog
        .projection(
            "game",
            &ColumnSelection::parse("nonexistent_col"),
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownColumn { .. }));

    let err = catalog
        .projection(
            "game",
            &ColumnSelection::parse("game_id"),
            &parse_filters("game_id=abc").unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidLiteral { .. }));

    println!("     ✓ Validation failures surfaced before execution");
}

pub async fn test_count_rows(ctx: &TestContext) {
    println!("  🧪 test_count_rows");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();
    assert_eq!(builder.count_rows(&catalog, "empty_table").await.unwrap(), 0);

    sqlx::query("INSERT INTO Empty_Table VALUES (1)")
        .execute(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(builder.count_rows(&catalog, "empty_table").await.unwrap(), 1);

    println!("     ✓ Row count tracks inserts");
}

pub async fn test_concurrent_queries(ctx: &TestContext) {
    println!("  🧪 test_concurrent_queries");

    let catalog = ctx.catalog().await;
    let builder = ctx.builder();
    let runs = (0..20).map(|i| {
        let catalog = &catalog;
        let builder = &builder;
        async move {
            if i % 2 == 0 {
                table_query(catalog, builder, "game", "game_name", "game_id=2").await
            } else {
                table_query(catalog, builder, "gamereview", "author", "game_id=1").await
            }
        }
    });
    let results = futures::future::join_all(runs).await;

    for (i, rs) in results.iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(rs.rows, vec![vec![json!("Go")]]);
        } else {
            assert_eq!(rs.rows, vec![vec![json!("ann")]]);
        }
    }

    println!("     ✓ 20 concurrent queries returned their own rows");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📋 Table query tests");
    test_introspected_catalog(ctx).await;
    test_catalog_include_exclude(ctx).await;
    test_projection_with_numeric_filter(ctx).await;
    test_date_and_text_filters(ctx).await;
    test_unmapped_types_project_as_text(ctx).await;
    test_injection_literals_are_data(ctx).await;
    test_invalid_requests_never_reach_database(ctx).await;
    test_count_rows(ctx).await;
    test_concurrent_queries(ctx).await;
}
