use crate::error::{SignalingError, SignalingResult};
use crate::signaling::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use switchboard_core::{PeerId, SessionDescription};
use tracing::{info, warn};

/// `GET /list-servers`: ids of every connected peer.
pub async fn list_servers(State(state): State<AppState>) -> Json<Vec<String>> {
    let ids = state
        .registry
        .list()
        .into_iter()
        .map(|peer_id| peer_id.to_string())
        .collect();
    Json(ids)
}

/// `POST /connect/{id}`: relays a browser's offer to the peer and returns its answer.
pub async fn connect(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(offer): Json<SessionDescription>,
) -> SignalingResult<Json<SessionDescription>> {
    let peer_id: PeerId = id
        .parse()
        .map_err(|_| SignalingError::UnknownPeer(id.clone()))?;

    info!(peer_id = %peer_id, sdp_type = ?offer.sdp_type, "Relaying offer");

    match state.registry.connect(&peer_id, &offer).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            warn!(peer_id = %peer_id, error = %e, "Negotiation failed");
            Err(e)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    peers: usize,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        peers: state.registry.len(),
    })
}
