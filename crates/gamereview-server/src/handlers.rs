//! Request handlers.

use crate::error::{ApiError, mutation_response};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gamereview_adapter_pg::{DemoRename, DemoRow, NewReview, ReviewKey, ReviewUpdate};
use gamereview_query::{ColumnSelection, ResultSet, parse_filters};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

/// Query string of `GET /table-query`.
#[derive(Debug, Default, Deserialize)]
pub struct TableQueryParams {
    pub table: Option<String>,
    #[serde(default)]
    pub columns: String,
    #[serde(default)]
    pub filters: String,
}

pub async fn table_query(
    State(state): State<AppState>,
    Query(params): Query<TableQueryParams>,
) -> Result<Json<ResultSet>, ApiError> {
    let table = params.table.ok_or(ApiError::MissingParameter("table"))?;
    let filters = parse_filters(&params.filters)?;
    let request = state
        .catalog
        .projection(&table, &ColumnSelection::parse(&params.columns), &filters)?;

    let result = state.queries.run(&request).await?;
    info!(
        table = %table,
        columns = request.columns().len(),
        filters = request.filters().len(),
        rows = result.len(),
        "table query served"
    );
    Ok(Json(result))
}

pub async fn list_tables(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "tables": state.catalog.list_tables() }))
}

pub async fn table_columns(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let table = state.catalog.describe_table(&name)?;
    Ok(Json(json!({ "columns": table.columns })))
}

pub async fn check_db_connection(State(state): State<AppState>) -> &'static str {
    if state.health.is_connected().await {
        "connected"
    } else {
        "unable to connect"
    }
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "gamereview" }))
}

pub async fn insert_gamereview(
    State(state): State<AppState>,
    Json(review): Json<NewReview>,
) -> Response {
    mutation_response("insert-gamereview", state.reviews.insert_review(&review).await)
}

pub async fn update_gamereview(
    State(state): State<AppState>,
    Json(update): Json<ReviewUpdate>,
) -> Response {
    mutation_response("update-gamereview", state.reviews.update_review(&update).await)
}

pub async fn delete_gamereview(
    State(state): State<AppState>,
    Json(key): Json<ReviewKey>,
) -> Response {
    mutation_response("delete-gamereview", state.reviews.delete_review(&key).await)
}

#[derive(Debug, Deserialize)]
pub struct FindGamesBody {
    #[serde(default)]
    pub genres: Vec<String>,
}

pub async fn find_games(
    State(state): State<AppState>,
    Json(body): Json<FindGamesBody>,
) -> Response {
    if body.genres.is_empty() {
        return Json(json!([])).into_response();
    }
    match state.reviews.find_games(&body.genres).await {
        Ok(games) => Json(games).into_response(),
        Err(e) => {
            error!(error = %e, "find-games failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false })),
            )
                .into_response()
        }
    }
}

pub async fn initiate_demotable(State(state): State<AppState>) -> Response {
    let outcome = state.demo.initiate().await.map(|()| true);
    mutation_response("initiate-demotable", outcome)
}

pub async fn insert_demotable(
    State(state): State<AppState>,
    Json(row): Json<DemoRow>,
) -> Response {
    mutation_response("insert-demotable", state.demo.insert(&row).await)
}

pub async fn update_name_demotable(
    State(state): State<AppState>,
    Json(rename): Json<DemoRename>,
) -> Response {
    mutation_response("update-name-demotable", state.demo.rename(&rename).await)
}

pub async fn count_demotable(State(state): State<AppState>) -> Response {
    match state.demo.count().await {
        Ok(count) => Json(json!({ "success": true, "count": count })).into_response(),
        Err(e) => {
            error!(error = %e, "count-demotable failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "count": -1 })),
            )
                .into_response()
        }
    }
}
