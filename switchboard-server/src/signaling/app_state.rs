use crate::actor::ActorConfig;
use crate::registry::PeerRegistry;
use tokio_util::sync::CancellationToken;

/// State shared by every signaling route.
#[derive(Clone)]
pub struct AppState {
    pub registry: PeerRegistry,
    pub actor_config: ActorConfig,
    /// Cancelled on server shutdown; every peer actor runs under a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(registry: PeerRegistry, actor_config: ActorConfig) -> Self {
        Self {
            registry,
            actor_config,
            shutdown: CancellationToken::new(),
        }
    }
}
