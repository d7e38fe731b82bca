use crate::transport::{FrameSink, FrameStream, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

/// In-process transport; one end of a pair created by [`MemoryTransport::pair`].
///
/// Dropping either end closes the connection for the other.
pub struct MemoryTransport {
    tx: mpsc::UnboundedSender<Bytes>,
    rx: mpsc::UnboundedReceiver<Bytes>,
}

impl MemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();

        (Self { tx: a_tx, rx: a_rx }, Self { tx: b_tx, rx: b_rx })
    }
}

impl Transport for MemoryTransport {
    type Sink = MemorySink;
    type Stream = MemoryStream;

    fn split(self) -> (Self::Sink, Self::Stream) {
        (MemorySink { tx: self.tx }, MemoryStream { rx: self.rx })
    }
}

pub struct MemorySink {
    tx: mpsc::UnboundedSender<Bytes>,
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }
}

pub struct MemoryStream {
    rx: mpsc::UnboundedReceiver<Bytes>,
}

#[async_trait]
impl FrameStream for MemoryStream {
    async fn recv(&mut self) -> Result<Bytes, TransportError> {
        self.rx.recv().await.ok_or(TransportError::Closed)
    }
}
