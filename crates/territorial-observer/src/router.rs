//! Axum router construction for the Observer server.
//!
//! Assembles the page shell and the `WebSocket` route into a single
//! [`Router`] with CORS middleware enabled so the canvas client can be
//! served from anywhere during development.

use std::sync::Arc;

use axum::Router;
use axum::response::Html;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::ws;

/// Minimal page shell. The real client is external; this page exists so
/// hitting the server root in a browser shows something sensible.
const INDEX_HTML: &str = "<!doctype html>\n<html>\n<head><title>Territorial</title></head>\n<body>\n<p>Territorial simulation server. Connect a client to <code>/ws/square</code>.</p>\n</body>\n</html>\n";

/// Build the complete Axum router.
///
/// - `GET /` -- minimal HTML shell
/// - `GET /ws/square` -- `WebSocket` simulation stream
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/ws/square", get(ws::ws_square))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the page shell.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
