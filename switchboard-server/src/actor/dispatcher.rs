use crate::actor::ActorConfig;
use crate::actor::peer_actor::NegotiationRequest;
use crate::error::{SignalingError, SignalingResult};
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;
use switchboard_core::{CorrelationId, Envelope, PeerId};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Single owner of an actor's pending table.
///
/// Invariant: a correlation id is pending iff it is a key of `pending`. Entries are
/// inserted when a request is enqueued and removed by the matching reply, by the
/// waiter's timeout, or all at once on shutdown.
pub(crate) struct Dispatcher {
    peer_id: PeerId,
    pending: HashMap<CorrelationId, oneshot::Sender<Bytes>>,
    outbound: mpsc::Sender<Bytes>,
    expired_tx: mpsc::UnboundedSender<CorrelationId>,
    expired_rx: mpsc::UnboundedReceiver<CorrelationId>,
    stopped: CancellationToken,
    config: ActorConfig,
}

impl Dispatcher {
    pub(crate) fn new(
        peer_id: PeerId,
        outbound: mpsc::Sender<Bytes>,
        stopped: CancellationToken,
        config: ActorConfig,
    ) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();

        Self {
            peer_id,
            pending: HashMap::new(),
            outbound,
            expired_tx,
            expired_rx,
            stopped,
            config,
        }
    }

    pub(crate) async fn run(
        mut self,
        mut inbound: mpsc::Receiver<Bytes>,
        mut requests: mpsc::Receiver<NegotiationRequest>,
    ) -> SignalingResult<()> {
        loop {
            tokio::select! {
                biased;

                _ = self.stopped.cancelled() => break,

                frame = inbound.recv() => match frame {
                    Some(frame) => self.handle_frame(&frame)?,
                    None => break,
                },

                Some(id) = self.expired_rx.recv() => self.expire(&id),

                Some(request) = requests.recv() => self.handle_request(request),
            }
        }

        self.shutdown(requests);
        Ok(())
    }

    fn handle_frame(&mut self, frame: &[u8]) -> SignalingResult<()> {
        let envelope = Envelope::decode(frame)?;

        let Some(id) = envelope.id else {
            warn!(peer_id = %self.peer_id, "Dropping reply without correlation id");
            return Ok(());
        };

        let Some(sink) = self.pending.remove(&id) else {
            warn!(
                peer_id = %self.peer_id,
                correlation_id = %id,
                "Dropping reply with unknown correlation id"
            );
            return Ok(());
        };

        debug!(peer_id = %self.peer_id, correlation_id = %id, "Reply matched");
        // The waiter may already be gone if its caller timed out in the same instant.
        let _ = sink.send(envelope.payload);
        Ok(())
    }

    fn handle_request(&mut self, request: NegotiationRequest) {
        if self.pending.len() >= self.config.max_in_flight {
            warn!(
                peer_id = %self.peer_id,
                limit = self.config.max_in_flight,
                "Rejecting negotiation: too many in flight"
            );
            let _ = request
                .reply
                .send(Err(SignalingError::Overloaded(self.config.max_in_flight)));
            return;
        }

        let id = CorrelationId::new();
        let frame = match Envelope::new(id.clone(), request.payload).encode() {
            Ok(frame) => frame,
            Err(e) => {
                let _ = request.reply.send(Err(e.into()));
                return;
            }
        };

        // The dispatcher never waits on the writer.
        if let Err(e) = self.outbound.try_send(frame) {
            let error = match e {
                TrySendError::Full(_) => {
                    warn!(
                        peer_id = %self.peer_id,
                        "Rejecting negotiation: outbound queue is full"
                    );
                    SignalingError::Overloaded(self.config.max_in_flight)
                }
                TrySendError::Closed(_) => SignalingError::ActorStopped,
            };
            let _ = request.reply.send(Err(error));
            return;
        }

        let (answer_tx, answer_rx) = oneshot::channel();
        self.pending.insert(id.clone(), answer_tx);
        debug!(peer_id = %self.peer_id, correlation_id = %id, "Negotiation sent");

        tokio::spawn(wait_for_answer(
            self.peer_id,
            id,
            answer_rx,
            request.reply,
            self.expired_tx.clone(),
            self.stopped.clone(),
            self.config.negotiation_timeout,
        ));
    }

    fn expire(&mut self, id: &CorrelationId) {
        if self.pending.remove(id).is_some() {
            debug!(peer_id = %self.peer_id, correlation_id = %id, "Expired pending negotiation");
        }
    }

    fn shutdown(mut self, mut requests: mpsc::Receiver<NegotiationRequest>) {
        self.stopped.cancel();

        requests.close();
        while let Ok(request) = requests.try_recv() {
            let _ = request.reply.send(Err(SignalingError::ActorStopped));
        }

        // Dropping the sinks resolves their waiters with `ActorStopped`.
        let purged = self.pending.len();
        self.pending.clear();

        info!(peer_id = %self.peer_id, purged, "Dispatcher stopped");
    }
}

async fn wait_for_answer(
    peer_id: PeerId,
    id: CorrelationId,
    answer: oneshot::Receiver<Bytes>,
    reply: oneshot::Sender<SignalingResult<Bytes>>,
    expired: mpsc::UnboundedSender<CorrelationId>,
    stopped: CancellationToken,
    timeout: Duration,
) {
    let outcome = tokio::select! {
        biased;

        answer = tokio::time::timeout(timeout, answer) => match answer {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(SignalingError::ActorStopped),
            Err(_) => {
                warn!(peer_id = %peer_id, correlation_id = %id, ?timeout, "Negotiation timed out");
                let _ = expired.send(id);
                Err(SignalingError::NegotiationTimeout(timeout))
            }
        },

        _ = stopped.cancelled() => Err(SignalingError::ActorStopped),
    };

    let _ = reply.send(outcome);
}
