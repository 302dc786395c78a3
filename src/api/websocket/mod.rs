//! WebSocket relay endpoint
//!
//! Clients connect at `/` and speak the relay protocol described in
//! [`messages`]. Each connection owns a [`Session`]; accepted events are
//! fanned out to every session through the broadcast channel in
//! [`AppState`] and delivered to the subscriptions they match.

pub mod handler;
pub mod messages;
pub mod session;
pub mod state;

pub use handler::ws_handler;
pub use messages::{ClientMessage, ProtocolError, RelayMessage, MAX_SUBSCRIPTION_ID_LEN};
pub use session::Session;
pub use state::AppState;
