use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,

    #[error("transport i/o error: {0}")]
    Io(String),
}

/// Write half of a peer connection. One frame per call; an error ends the connection.
#[async_trait]
pub trait FrameSink: Send + 'static {
    async fn send(&mut self, frame: Bytes) -> Result<(), TransportError>;
}

/// Read half of a peer connection. One frame per call; an error ends the connection.
#[async_trait]
pub trait FrameStream: Send + 'static {
    async fn recv(&mut self) -> Result<Bytes, TransportError>;
}

/// Duplex frame connection to a single peer.
///
/// Split into independently owned halves so reading and writing never wait on each other.
pub trait Transport: Send + 'static {
    type Sink: FrameSink;
    type Stream: FrameStream;

    fn split(self) -> (Self::Sink, Self::Stream);
}
