use crate::actor::PeerActor;
use crate::signaling::AppState;
use crate::transport::WsTransport;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

/// `GET /ws`: entry point for backend peers. The connection lives as long as its actor.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (actor, runner) = PeerActor::new(WsTransport::new(socket), state.actor_config.clone());
    let peer_id = actor.id();

    info!(peer_id = %peer_id, "New peer connection");
    state.registry.register(actor.clone());

    // The runner logs how the connection ended.
    let _ = runner.run(state.shutdown.child_token()).await;

    state.registry.unregister(&actor);
    info!(peer_id = %peer_id, "Peer unregistered");
}
