pub mod endpoint_tests;
pub mod registry_tests;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use switchboard_server::{
    ActorConfig, AppState, MemoryTransport, PeerActor, PeerRegistry, SignalingResult, router,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::utils::MockPeer;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// An actor running over an in-memory transport, with the scripted peer on the other end.
pub struct TestActor {
    pub actor: Arc<PeerActor>,
    pub peer: MockPeer,
    pub shutdown: CancellationToken,
    pub run: JoinHandle<SignalingResult<()>>,
}

pub fn spawn_test_actor(config: ActorConfig) -> TestActor {
    let (actor_end, peer_end) = MemoryTransport::pair();
    let (actor, runner) = PeerActor::new(actor_end, config);
    let shutdown = CancellationToken::new();

    let run = tokio::spawn(runner.run(shutdown.clone()));

    TestActor {
        actor,
        peer: MockPeer::new(peer_end),
        shutdown,
        run,
    }
}

/// Wait for `Run` to return, failing the test if it does not within a few seconds.
pub async fn join_run(run: JoinHandle<SignalingResult<()>>) -> SignalingResult<()> {
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("actor did not stop in time")
        .expect("actor task panicked")
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub app: Router,
    pub state: AppState,
}

pub async fn start_test_server(config: ActorConfig) -> TestServer {
    let state = AppState::new(PeerRegistry::new(), config);
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let serve_app = app.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, serve_app).await;
    });

    TestServer { addr, app, state }
}

/// Poll `condition` every 10ms until it holds or `timeout_ms` elapses.
pub async fn wait_until(timeout_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
