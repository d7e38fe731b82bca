use crate::actor::{ActorConfig, ActorRunner};
use crate::error::{SignalingError, SignalingResult};
use crate::transport::Transport;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use switchboard_core::PeerId;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// A negotiation submitted to the dispatcher. Resolved exactly once through `reply`.
pub(crate) struct NegotiationRequest {
    pub(crate) payload: Bytes,
    pub(crate) reply: oneshot::Sender<SignalingResult<Bytes>>,
}

/// Shareable handle to the signaling actor of one connected peer.
///
/// The handle only submits work; the paired [`ActorRunner`] owns the transport and
/// the pending table. Once the actor has stopped, every call fails fast with
/// [`SignalingError::ActorStopped`].
pub struct PeerActor {
    id: PeerId,
    requests: mpsc::Sender<NegotiationRequest>,
    stopped: CancellationToken,
    negotiation_timeout: Duration,
}

impl PeerActor {
    /// Creates an actor for a freshly connected peer, assigning it a new [`PeerId`].
    pub fn new<T: Transport>(transport: T, config: ActorConfig) -> (Arc<Self>, ActorRunner<T>) {
        Self::with_id(PeerId::new(), transport, config)
    }

    pub fn with_id<T: Transport>(
        id: PeerId,
        transport: T,
        config: ActorConfig,
    ) -> (Arc<Self>, ActorRunner<T>) {
        let (requests_tx, requests_rx) = mpsc::channel(config.queue_capacity.max(1));
        let stopped = CancellationToken::new();

        let actor = Arc::new(Self {
            id,
            requests: requests_tx,
            stopped: stopped.clone(),
            negotiation_timeout: config.negotiation_timeout,
        });
        let runner = ActorRunner::new(id, transport, requests_rx, stopped, config);

        (actor, runner)
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_cancelled()
    }

    /// Stops the actor as if its shutdown token had fired.
    pub fn stop(&self) {
        self.stopped.cancel();
    }

    /// Sends `offer` to the peer as JSON and decodes its JSON reply.
    ///
    /// Encoding and decoding failures only affect this call.
    pub async fn negotiate<O, A>(&self, offer: &O) -> SignalingResult<A>
    where
        O: Serialize + ?Sized,
        A: DeserializeOwned,
    {
        let payload = serde_json::to_vec(offer).map_err(SignalingError::PayloadCodec)?;
        let answer = self.raw_negotiate(Bytes::from(payload)).await?;
        serde_json::from_slice(&answer).map_err(SignalingError::PayloadCodec)
    }

    /// Sends an opaque payload to the peer and waits for the payload it replies with.
    ///
    /// The negotiation timeout covers the whole call, including time spent queued
    /// behind other callers.
    pub async fn raw_negotiate(&self, payload: Bytes) -> SignalingResult<Bytes> {
        if self.stopped.is_cancelled() {
            return Err(SignalingError::ActorStopped);
        }

        let timeout = self.negotiation_timeout;
        tokio::time::timeout(timeout, self.submit(payload))
            .await
            .unwrap_or(Err(SignalingError::NegotiationTimeout(timeout)))
    }

    async fn submit(&self, payload: Bytes) -> SignalingResult<Bytes> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = NegotiationRequest {
            payload,
            reply: reply_tx,
        };

        tokio::select! {
            biased;
            _ = self.stopped.cancelled() => return Err(SignalingError::ActorStopped),
            sent = self.requests.send(request) => {
                sent.map_err(|_| SignalingError::ActorStopped)?;
            }
        }

        tokio::select! {
            biased;
            outcome = reply_rx => outcome.unwrap_or(Err(SignalingError::ActorStopped)),
            _ = self.stopped.cancelled() => Err(SignalingError::ActorStopped),
        }
    }
}

impl std::fmt::Debug for PeerActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerActor")
            .field("id", &self.id)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
