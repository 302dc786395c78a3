//! REST API module for HTTP endpoints
//!
//! One-shot access to the window for clients that do not hold a socket:
//! - `GET /api/stats` - Window statistics
//! - `POST /api/query` - Events matching a filter
//! - `POST /api/count` - Number of events matching a filter

pub mod events;
pub mod stats;

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Total count, for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, total: None }
    }

    pub fn with_total(data: T, total: usize) -> Self {
        Self {
            data,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    /// A filter refused by policy
    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BLOCKED".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}
