//! Stats endpoint

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use super::ApiResponse;
use crate::api::websocket::AppState;
use crate::store::WindowStats;
use crate::utils::format_timestamp;

/// Response for GET /api/stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub window: WindowStats,
    pub fill_ratio: f64,
    pub connections: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

/// GET /api/stats - Window and connection statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let window = state.window.stats();

    Json(ApiResponse::new(StatsResponse {
        window,
        fill_ratio: window.fill_ratio(),
        connections: state.connection_count(),
        started_at: format_timestamp(state.started_at()),
    }))
}
