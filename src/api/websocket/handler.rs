//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;

use super::messages::RelayMessage;
use super::session::Session;
use super::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.subscribe();
    let mut session = Session::new(state.max_subscriptions);

    let open = state.connection_opened();
    tracing::debug!(connections = open, "client connected");

    loop {
        tokio::select! {
            // Live events accepted on any connection
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_all(&mut socket, session.live_matches(&event)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(missed = n, "client lagging behind live events");
                        let notice = RelayMessage::notice(format!("missed {} live events", n));
                        if !send_all(&mut socket, vec![notice]).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // Client frames
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        let replies = session.handle_text(&state, &text);
                        if !send_all(&mut socket, replies).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        let notice = RelayMessage::notice("invalid: binary frames are not supported");
                        if !send_all(&mut socket, vec![notice]).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "websocket error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    let open = state.connection_closed();
    tracing::debug!(
        connections = open,
        subscriptions = session.subscription_count(),
        "client disconnected"
    );
}

/// Send frames in order, returning false once the client is gone
async fn send_all(socket: &mut WebSocket, messages: Vec<RelayMessage>) -> bool {
    for message in messages {
        if socket.send(Message::Text(message.to_json())).await.is_err() {
            return false;
        }
    }
    true
}
