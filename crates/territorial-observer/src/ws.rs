//! `WebSocket` handler for the simulation stream.
//!
//! Clients connect to `GET /ws/square` and receive JSON text frames:
//! one `map` frame at connect (the static biome color map), then the
//! periodic `grid_update`, `square_info` and `boat` frames published by
//! the broadcast tasks. Clients never send simulation input; inbound
//! traffic is limited to pings and close frames.
//!
//! If a client falls behind, lagged frames are silently skipped and the
//! client resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use territorial_types::WireMessage;
use tracing::{debug, warn};

use crate::encode;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming simulation frames.
///
/// # Route
///
/// `GET /ws/square`
pub async fn ws_square(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the one-off map frame, then
/// forward every broadcast frame as JSON text.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before the map frame so no broadcast is missed in between.
    let mut rx = state.subscribe();

    let map_frame = {
        let game = state.game.read().await;
        encode::encode_grid(&game.map.color_map).map(|grid| WireMessage::Map { grid })
    };
    match map_frame {
        Ok(frame) => {
            if send_frame(&mut socket, &frame).await.is_err() {
                debug!("WebSocket client disconnected before map frame");
                return;
            }
        }
        Err(e) => {
            warn!(error = %e, "Map frame encoding failed, closing socket");
            return;
        }
    }

    loop {
        tokio::select! {
            // Forward a broadcast frame from the simulation.
            result = rx.recv() => {
                match result {
                    Ok(frame) => {
                        if send_frame(&mut socket, &frame).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Watch for close frames and pings from the client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Clients are read-only; ignore stray text/binary.
                    }
                }
            }
        }
    }
}

/// Serialize one frame and send it as a text message.
async fn send_frame(socket: &mut WebSocket, frame: &WireMessage) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "Frame serialization failed, skipping");
            return Ok(());
        }
    };
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_send_err| ())
}
