//! DEMOTABLE tests against a live database.

use super::common::*;
use gamereview_adapter_pg::{DemoRename, DemoRow, DemoStore, PgDemoStore};

pub async fn test_demotable_lifecycle(ctx: &TestContext) {
    println!("  🧪 test_demotable_lifecycle");

    let store = PgDemoStore::new(ctx.pool.clone());
    store.initiate().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);

    for (id, name) in [(1, "alpha"), (2, "beta"), (3, "alpha")] {
        let row = DemoRow {
            id,
            name: name.to_string(),
        };
        assert!(store.insert(&row).await.unwrap());
    }
    assert_eq!(store.count().await.unwrap(), 3);

    let renamed = store
        .rename(&DemoRename {
            old_name: "alpha".to_string(),
            new_name: "gamma".to_string(),
        })
        .await
        .unwrap();
    assert!(renamed);

    let missing = store
        .rename(&DemoRename {
            old_name: "alpha".to_string(),
            new_name: "delta".to_string(),
        })
        .await
        .unwrap();
    assert!(!missing);

    // recreating empties the table
    store.initiate().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);

    println!("     ✓ Initiate, insert, rename and count behave");
}

pub async fn test_demotable_duplicate_id(ctx: &TestContext) {
    println!("  🧪 test_demotable_duplicate_id");

    let store = PgDemoStore::new(ctx.pool.clone());
    store.initiate().await.unwrap();
    let row = DemoRow {
        id: 7,
        name: "x".to_string(),
    };
    assert!(store.insert(&row).await.unwrap());
    assert!(store.insert(&row).await.is_err());

    println!("     ✓ Duplicate id rejected");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📋 Demo table tests");
    test_demotable_lifecycle(ctx).await;
    test_demotable_duplicate_id(ctx).await;
}
