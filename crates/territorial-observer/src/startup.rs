//! Observer server startup: bind, then serve on a background task.
//!
//! The engine calls [`spawn_observer`] during startup so the observer
//! runs concurrently with the tick scheduler. The TCP bind happens
//! eagerly, before the background task is spawned: a bad address or an
//! occupied port aborts engine startup instead of failing silently in
//! the background. Only the serve loop itself runs on the spawned task,
//! where a fatal I/O error is logged and the rest of the simulation
//! keeps ticking.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Listen address for the observer server.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Errors that can occur while bringing the observer server up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The configured host/port does not form a valid socket address.
    #[error("invalid listen address {addr}: {message}")]
    InvalidAddress {
        /// The rejected `host:port` string.
        addr: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Binding the TCP listener failed (port taken, privileges, ...).
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Bind the observer's listen address and serve it on a background
/// Tokio task.
///
/// Returns the serve task's [`JoinHandle`]; the engine parks on it so
/// the process lives as long as the observer does. Subscribers connect
/// to `/ws/square` on the bound address.
///
/// # Errors
///
/// Returns [`StartupError::InvalidAddress`] when the configured
/// host/port does not parse, or [`StartupError::Bind`] when the
/// listener cannot bind.
pub async fn spawn_observer(
    config: ObserverConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr_str = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = addr_str
        .parse()
        .map_err(|e: std::net::AddrParseError| StartupError::InvalidAddress {
            addr: addr_str,
            message: e.to_string(),
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let router = build_router(state);
    info!(%addr, "Observer server listening");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "Observer server exited with error");
        }
    });

    Ok(handle)
}
