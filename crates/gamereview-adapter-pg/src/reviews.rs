//! Fixed-shape statements over `GameReview`, `Game` and `inGenre`.
//!
//! Nothing here interpolates client text: every value is a bound parameter
//! and every identifier is a literal in the statement.

use crate::decode::decode_column;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::Row;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// A review to insert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewReview {
    pub game_id: i64,
    pub author: String,
    pub rev_desc: String,
    pub score: f64,
}

/// New description and score for an existing review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    #[serde(rename = "gameID")]
    pub game_id: i64,
    pub author: String,
    pub rev_desc: String,
    pub score: f64,
}

/// Identifies one review: an author reviews a game at most once.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewKey {
    #[serde(rename = "gameID")]
    pub game_id: i64,
    pub author: String,
}

/// A game matched by a genre search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub game_id: serde_json::Value,
    pub name: String,
}

/// Review and genre operations behind the mutation routes.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a review. `Ok(true)` when a row was written.
    async fn insert_review(&self, review: &NewReview) -> anyhow::Result<bool>;

    /// Update a review's description and score. `Ok(false)` when no review matched.
    async fn update_review(&self, update: &ReviewUpdate) -> anyhow::Result<bool>;

    /// Delete a review. `Ok(false)` when no review matched.
    async fn delete_review(&self, key: &ReviewKey) -> anyhow::Result<bool>;

    /// Games that belong to every one of `genres`.
    async fn find_games(&self, genres: &[String]) -> anyhow::Result<Vec<GameSummary>>;
}

/// [`ReviewStore`] on a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Deduplicated genre names; the division counts distinct genres.
pub fn distinct_genres(genres: &[String]) -> Vec<String> {
    genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert_review(&self, review: &NewReview) -> anyhow::Result<bool> {
        info!(game_id = review.game_id, author = %review.author, "inserting review");
        let result = sqlx::query(
            "INSERT INTO GameReview (game_id, author, rev_desc, score) VALUES ($1, $2, $3, $4)",
        )
        .bind(review.game_id)
        .bind(&review.author)
        .bind(&review.rev_desc)
        .bind(review.score)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_review(&self, update: &ReviewUpdate) -> anyhow::Result<bool> {
        info!(game_id = update.game_id, author = %update.author, "updating review");
        let result = sqlx::query(
            "UPDATE GameReview SET rev_desc = $1, score = $2 WHERE author = $3 AND game_id = $4",
        )
        .bind(&update.rev_desc)
        .bind(update.score)
        .bind(&update.author)
        .bind(update.game_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_review(&self, key: &ReviewKey) -> anyhow::Result<bool> {
        info!(game_id = key.game_id, author = %key.author, "deleting review");
        let result = sqlx::query("DELETE FROM GameReview WHERE author = $1 AND game_id = $2")
            .bind(&key.author)
            .bind(key.game_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_games(&self, genres: &[String]) -> anyhow::Result<Vec<GameSummary>> {
        let genres = distinct_genres(genres);
        if genres.is_empty() {
            return Ok(Vec::new());
        }
        debug!(genres = genres.len(), "finding games in all genres");

        let rows = sqlx::query(
            r#"
            SELECT ga.game_id, ga.game_name
            FROM inGenre g
            JOIN Game ga ON g.game_id = ga.game_id
            WHERE g.genre_name = ANY($1)
            GROUP BY ga.game_id, ga.game_name
            HAVING COUNT(DISTINCT g.genre_name) = $2
            ORDER BY ga.game_id
            "#,
        )
        .bind(genres.as_slice())
        .bind(genres.len() as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> anyhow::Result<GameSummary> {
                Ok(GameSummary {
                    game_id: decode_column(row, 0)?,
                    name: row.try_get::<String, _>(1)?,
                })
            })
            .collect()
    }
}
