use crate::actor::PeerActor;
use crate::error::{SignalingError, SignalingResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use switchboard_core::{PeerId, SessionDescription};
use tracing::{debug, info};

/// Directory of live signaling actors, keyed by peer id.
///
/// Cheap to clone; clones share the same map. The lock guards map access only and
/// is never held while a negotiation is in progress.
#[derive(Clone, Default)]
pub struct PeerRegistry {
    peers: Arc<RwLock<HashMap<PeerId, Arc<PeerActor>>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time snapshot of the registered peer ids.
    pub fn list(&self) -> Vec<PeerId> {
        self.peers.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<Arc<PeerActor>> {
        self.peers.read().get(peer_id).cloned()
    }

    /// Inserts `actor`, replacing any actor registered under the same id.
    pub fn register(&self, actor: Arc<PeerActor>) -> Option<Arc<PeerActor>> {
        let peer_id = actor.id();
        let replaced = self.peers.write().insert(peer_id, actor);

        if replaced.is_some() {
            info!(peer_id = %peer_id, "Peer re-registered, previous actor replaced");
        } else {
            info!(peer_id = %peer_id, "Peer registered");
        }
        replaced
    }

    /// Removes `actor` only if it is the exact instance currently registered under its id.
    pub fn unregister(&self, actor: &Arc<PeerActor>) -> bool {
        let peer_id = actor.id();
        let mut peers = self.peers.write();

        let is_current = peers
            .get(&peer_id)
            .is_some_and(|current| Arc::ptr_eq(current, actor));
        if is_current {
            peers.remove(&peer_id);
        }
        drop(peers);

        if is_current {
            info!(peer_id = %peer_id, "Peer unregistered");
        } else {
            debug!(peer_id = %peer_id, "Skipping unregister of a stale actor");
        }
        is_current
    }

    /// Negotiates with the peer registered under `peer_id`, forwarding its answer or error.
    pub async fn connect(
        &self,
        peer_id: &PeerId,
        offer: &SessionDescription,
    ) -> SignalingResult<SessionDescription> {
        let actor = self
            .get(peer_id)
            .ok_or_else(|| SignalingError::UnknownPeer(peer_id.to_string()))?;

        actor.negotiate(offer).await
    }
}
