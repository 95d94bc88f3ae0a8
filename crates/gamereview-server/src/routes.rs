//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/check-db-connection", get(handlers::check_db_connection))
        // Schema-whitelisted table queries
        .route("/table-query", get(handlers::table_query))
        .route("/tables", get(handlers::list_tables))
        .route("/tables/{name}/columns", get(handlers::table_columns))
        // Reviews
        .route("/insert-gamereview", post(handlers::insert_gamereview))
        .route("/update-gamereview", post(handlers::update_gamereview))
        .route("/delete-gamereview", post(handlers::delete_gamereview))
        .route("/find-games", post(handlers::find_games))
        // Demo table
        .route("/initiate-demotable", post(handlers::initiate_demotable))
        .route("/insert-demotable", post(handlers::insert_demotable))
        .route("/update-name-demotable", post(handlers::update_name_demotable))
        .route("/count-demotable", get(handlers::count_demotable))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
