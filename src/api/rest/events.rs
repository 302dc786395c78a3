//! Query and count endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};

use super::{ApiError, ApiResponse};
use crate::api::websocket::AppState;
use crate::types::Filter;

/// POST /api/query - Events matching the posted filter, oldest first
pub async fn query_events(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Response {
    if let Err(rejection) = state.filter_policies.evaluate(&filter) {
        return blocked(rejection);
    }

    match state.store().query_events(&filter) {
        Ok(events) => {
            let total = events.len();
            Json(ApiResponse::with_total(events, total)).into_response()
        }
        Err(e) => internal(e),
    }
}

/// POST /api/count - Number of events matching the posted filter
pub async fn count_events(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Response {
    if let Err(rejection) = state.filter_policies.evaluate(&filter) {
        return blocked(rejection);
    }

    match state.store().count_events(&filter) {
        Ok(count) => Json(ApiResponse::new(count)).into_response(),
        Err(e) => internal(e),
    }
}

fn blocked(reason: impl std::fmt::Display) -> Response {
    let error = ApiError::blocked(format!("blocked: {}", reason));
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

fn internal(e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, "query failed");
    let error = ApiError::internal(e.to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}
