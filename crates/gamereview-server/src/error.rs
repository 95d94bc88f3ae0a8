//! Error types for the HTTP layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gamereview_query::QueryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by the table-query and catalog routes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was absent.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// Validation or execution failure from the query layer.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Query(QueryError::UnknownTable { .. }) => StatusCode::NOT_FOUND,
            ApiError::Query(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MissingParameter",
            ApiError::Query(e) => e.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // driver messages stay in the server log
            error!(error = %self, "table query failed");
            "query execution failed".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Response for the review and demo-table mutation routes: `{success}` with
/// 200 on success, 500 otherwise.
pub fn mutation_response(action: &str, outcome: anyhow::Result<bool>) -> Response {
    match outcome {
        Ok(true) => Json(json!({ "success": true })).into_response(),
        Ok(false) => {
            tracing::info!(action, "no rows affected");
            failure()
        }
        Err(e) => {
            error!(action, error = %e, "mutation failed");
            failure()
        }
    }
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false })),
    )
        .into_response()
}
