use bytes::Bytes;
use std::time::Duration;
use switchboard_server::{ActorConfig, SignalingError};

use crate::integration::{TestActor, init_tracing, spawn_test_actor};

#[tokio::test]
async fn test_unanswered_negotiation_times_out_and_late_reply_is_dropped() {
    init_tracing();

    let config = ActorConfig {
        negotiation_timeout: Duration::from_millis(100),
        ..ActorConfig::default()
    };
    let TestActor {
        actor,
        mut peer,
        run,
        ..
    } = spawn_test_actor(config);

    let caller = tokio::spawn({
        let actor = actor.clone();
        async move { actor.raw_negotiate(Bytes::from_static(b"offer")).await }
    });
    let stale = peer.next_request().await.unwrap();

    let outcome = caller.await.unwrap();
    assert!(matches!(outcome, Err(SignalingError::NegotiationTimeout(_))));

    // The reply finally shows up; it no longer matches anything.
    peer.reply(stale.id.as_ref().unwrap(), Bytes::from_static(b"too late"))
        .await
        .unwrap();

    let caller = tokio::spawn({
        let actor = actor.clone();
        async move { actor.raw_negotiate(Bytes::from_static(b"retry")).await }
    });
    let fresh = peer.next_request().await.unwrap();
    assert_ne!(fresh.id, stale.id);
    peer.reply(fresh.id.as_ref().unwrap(), Bytes::from_static(b"answer"))
        .await
        .unwrap();

    assert_eq!(
        caller.await.unwrap().unwrap(),
        Bytes::from_static(b"answer")
    );
    assert!(!run.is_finished());
}
