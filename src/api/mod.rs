//! API module for HTTP and WebSocket endpoints
//!
//! The relay protocol is served over WebSocket at `/`; a small REST
//! surface under `/api` answers one-shot queries and exposes statistics.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::AppState;
