//! Review and genre-division tests against a live database.

use super::common::*;
use gamereview_adapter_pg::{NewReview, PgReviewStore, ReviewKey, ReviewStore, ReviewUpdate};
use serde_json::json;

pub async fn test_insert_update_delete_review(ctx: &TestContext) {
    println!("  🧪 test_insert_update_delete_review");

    let store = PgReviewStore::new(ctx.pool.clone());
    let inserted = store
        .insert_review(&NewReview {
            game_id: 2,
            author: "cy".to_string(),
            rev_desc: "solid".to_string(),
            score: 7.0,
        })
        .await
        .unwrap();
    assert!(inserted);

    let updated = store
        .update_review(&ReviewUpdate {
            game_id: 2,
            author: "cy".to_string(),
            rev_desc: "grew on me".to_string(),
            score: 8.0,
        })
        .await
        .unwrap();
    assert!(updated);

    let (desc, score): (String, i32) =
        sqlx::query_as("SELECT rev_desc, score FROM GameReview WHERE author = 'cy'")
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(desc, "grew on me");
    assert_eq!(score, 8);

    let missing = store
        .update_review(&ReviewUpdate {
            game_id: 1,
            author: "nobody".to_string(),
            rev_desc: "-".to_string(),
            score: 1.0,
        })
        .await
        .unwrap();
    assert!(!missing);

    let key = ReviewKey {
        game_id: 2,
        author: "cy".to_string(),
    };
    assert!(store.delete_review(&key).await.unwrap());
    assert!(!store.delete_review(&key).await.unwrap());

    println!("     ✓ Review lifecycle reports affected rows");
}

pub async fn test_duplicate_review_is_an_error(ctx: &TestContext) {
    println!("  🧪 test_duplicate_review_is_an_error");

    let store = PgReviewStore::new(ctx.pool.clone());
    let result = store
        .insert_review(&NewReview {
            game_id: 1,
            author: "ann".to_string(),
            rev_desc: "again".to_string(),
            score: 9.0,
        })
        .await;
    assert!(result.is_err());

    println!("     ✓ Primary key violation surfaced as an error");
}

pub async fn test_find_games_division(ctx: &TestContext) {
    println!("  🧪 test_find_games_division");

    let store = PgReviewStore::new(ctx.pool.clone());

    let both = store
        .find_games(&["Strategy".to_string(), "Board".to_string()])
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&both).unwrap(),
        json!([{ "game_id": 1, "name": "Chess" }, { "game_id": 2, "name": "Go" }])
    );

    let abstract_board = store
        .find_games(&["Abstract".to_string(), "Board".to_string(), "Board".to_string()])
        .await
        .unwrap();
    assert_eq!(abstract_board.len(), 1);
    assert_eq!(abstract_board[0].name, "Go");

    assert!(store.find_games(&[]).await.unwrap().is_empty());

    println!("     ✓ Only games in every listed genre returned");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📋 Review tests");
    test_insert_update_delete_review(ctx).await;
    test_duplicate_review_is_an_error(ctx).await;
    test_find_games_division(ctx).await;
}
