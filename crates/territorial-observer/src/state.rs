//! Shared application state for the Observer server.
//!
//! [`AppState`] couples the world handle (read side of the simulation's
//! lock) with the broadcast channel the periodic tasks publish wire
//! frames into. Every `WebSocket` client gets its own receiver; a
//! client that falls behind skips ahead to the newest frame, and a
//! failed send tears down only that client's stream.

use std::sync::Arc;

use territorial_core::SharedGame;
use territorial_types::WireMessage;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for wire frames.
///
/// If a subscriber falls behind by more than this many messages it
/// receives a [`broadcast::error::RecvError::Lagged`] and resumes from
/// the most recent frame.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for wire frames.
    pub tx: broadcast::Sender<WireMessage>,
    /// The shared simulation world.
    pub game: SharedGame,
}

impl AppState {
    /// Create application state over a shared world.
    pub fn new(game: SharedGame) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx, game }
    }

    /// Subscribe to the wire frame stream.
    pub fn subscribe(&self) -> broadcast::Receiver<WireMessage> {
        self.tx.subscribe()
    }

    /// Publish a frame to all connected clients.
    ///
    /// Returns the number of receivers that got the frame; zero when no
    /// client is connected, which is not an error.
    pub fn broadcast(&self, frame: WireMessage) -> usize {
        self.tx.send(frame).unwrap_or(0)
    }
}
