use crate::actor::ActorConfig;
use crate::actor::dispatcher::Dispatcher;
use crate::actor::peer_actor::NegotiationRequest;
use crate::error::{SignalingError, SignalingResult};
use crate::transport::{FrameSink, FrameStream, Transport, TransportError};
use bytes::Bytes;
use switchboard_core::PeerId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Drives a [`PeerActor`](crate::actor::PeerActor): owns its transport and runs the
/// reader, writer and dispatcher until the transport fails or shutdown is signaled.
pub struct ActorRunner<T> {
    id: PeerId,
    transport: T,
    requests: mpsc::Receiver<NegotiationRequest>,
    stopped: CancellationToken,
    config: ActorConfig,
}

impl<T: Transport> ActorRunner<T> {
    pub(crate) fn new(
        id: PeerId,
        transport: T,
        requests: mpsc::Receiver<NegotiationRequest>,
        stopped: CancellationToken,
        config: ActorConfig,
    ) -> Self {
        Self {
            id,
            transport,
            requests,
            stopped,
            config,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.id
    }

    /// Runs the actor to completion.
    ///
    /// Returns `Ok(())` once `shutdown` (or [`PeerActor::stop`](crate::actor::PeerActor::stop))
    /// fires, or the first fatal error: a transport failure or a malformed envelope.
    /// Every negotiation still waiting when this returns resolves with
    /// [`SignalingError::ActorStopped`].
    pub async fn run(self, shutdown: CancellationToken) -> SignalingResult<()> {
        let Self {
            id,
            transport,
            requests,
            stopped,
            config,
        } = self;

        // Whatever ends the run, callers must observe the actor as stopped.
        let _stop_on_exit = stopped.clone().drop_guard();

        let (sink, stream) = transport.split();
        let capacity = config.queue_capacity.max(1);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        // Sized to the in-flight limit; when full, new negotiations are rejected.
        let (outbound_tx, outbound_rx) = mpsc::channel(config.max_in_flight.max(1));

        info!(peer_id = %id, "Signaling actor started");

        let dispatcher = Dispatcher::new(id, outbound_tx, stopped.clone(), config);

        let result = tokio::try_join!(
            forward_shutdown(shutdown, stopped.clone()),
            read_frames(id, stream, inbound_tx, stopped.clone()),
            write_frames(id, sink, outbound_rx, stopped.clone()),
            dispatcher.run(inbound_rx, requests),
        );

        match result {
            Ok(_) => {
                info!(peer_id = %id, "Signaling actor stopped");
                Ok(())
            }
            Err(SignalingError::Transport(TransportError::Closed)) => {
                info!(peer_id = %id, "Signaling actor stopped: peer closed the connection");
                Err(SignalingError::Transport(TransportError::Closed))
            }
            Err(e) => {
                error!(peer_id = %id, error = %e, "Signaling actor failed");
                Err(e)
            }
        }
    }
}

async fn forward_shutdown(
    shutdown: CancellationToken,
    stopped: CancellationToken,
) -> SignalingResult<()> {
    tokio::select! {
        _ = shutdown.cancelled() => stopped.cancel(),
        _ = stopped.cancelled() => {}
    }
    Ok(())
}

async fn read_frames<S: FrameStream>(
    id: PeerId,
    mut stream: S,
    inbound: mpsc::Sender<Bytes>,
    stopped: CancellationToken,
) -> SignalingResult<()> {
    loop {
        let frame = tokio::select! {
            _ = stopped.cancelled() => return Ok(()),
            frame = stream.recv() => frame?,
        };
        debug!(peer_id = %id, len = frame.len(), "Frame received");

        tokio::select! {
            _ = stopped.cancelled() => return Ok(()),
            sent = inbound.send(frame) => {
                if sent.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

async fn write_frames<S: FrameSink>(
    id: PeerId,
    mut sink: S,
    mut outbound: mpsc::Receiver<Bytes>,
    stopped: CancellationToken,
) -> SignalingResult<()> {
    loop {
        let frame = tokio::select! {
            _ = stopped.cancelled() => return Ok(()),
            frame = outbound.recv() => match frame {
                Some(frame) => frame,
                None => return Ok(()),
            },
        };
        let len = frame.len();

        tokio::select! {
            _ = stopped.cancelled() => return Ok(()),
            sent = sink.send(frame) => sent?,
        }
        debug!(peer_id = %id, len, "Frame sent");
    }
}
