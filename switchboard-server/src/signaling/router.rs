use crate::signaling::{AppState, connect, health, list_servers, ws_handler};
use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Signaling routes with request tracing and panic recovery. CORS is left to the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/list-servers", get(list_servers))
        .route("/connect/{id}", post(connect))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
