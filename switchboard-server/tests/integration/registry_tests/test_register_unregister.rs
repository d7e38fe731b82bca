use switchboard_core::PeerId;
use switchboard_server::{ActorConfig, MemoryTransport, PeerActor, PeerRegistry};

#[tokio::test]
async fn test_register_replaces_and_unregister_guards_instance() {
    let registry = PeerRegistry::new();
    let peer_id = PeerId::new();

    let (old_transport, _old_peer) = MemoryTransport::pair();
    let (old_actor, _old_runner) =
        PeerActor::with_id(peer_id, old_transport, ActorConfig::default());
    let (new_transport, _new_peer) = MemoryTransport::pair();
    let (new_actor, _new_runner) =
        PeerActor::with_id(peer_id, new_transport, ActorConfig::default());

    assert!(registry.register(old_actor.clone()).is_none());

    let replaced = registry
        .register(new_actor.clone())
        .expect("previous registration is returned");
    assert!(std::sync::Arc::ptr_eq(&replaced, &old_actor));
    assert_eq!(registry.list(), vec![peer_id]);

    // The stale actor disconnecting must not evict its replacement.
    assert!(!registry.unregister(&old_actor));
    assert_eq!(registry.len(), 1);
    assert!(std::sync::Arc::ptr_eq(
        &registry.get(&peer_id).unwrap(),
        &new_actor
    ));

    assert!(registry.unregister(&new_actor));
    assert!(registry.is_empty());
    assert!(!registry.unregister(&new_actor));
}
