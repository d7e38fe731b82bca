use crate::transport::{FrameSink, FrameStream, Transport, TransportError};
use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::debug;

/// Transport over an upgraded axum WebSocket.
///
/// Frames go out as text messages when they are valid UTF-8 (envelopes always are),
/// otherwise as binary. Both text and binary messages are accepted inbound.
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Transport for WsTransport {
    type Sink = WsSink;
    type Stream = WsStream;

    fn split(self) -> (Self::Sink, Self::Stream) {
        let (sender, receiver) = self.socket.split();
        (WsSink { sender }, WsStream { receiver })
    }
}

pub struct WsSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        let msg = match Utf8Bytes::try_from(frame.clone()) {
            Ok(text) => Message::Text(text),
            Err(_) => Message::Binary(frame),
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

pub struct WsStream {
    receiver: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameStream for WsStream {
    async fn recv(&mut self) -> Result<Bytes, TransportError> {
        loop {
            match self.receiver.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Bytes::copy_from_slice(text.as_str().as_bytes()));
                }
                Some(Ok(Message::Binary(data))) => return Ok(data),
                Some(Ok(Message::Close(frame))) => {
                    debug!("WebSocket close frame received: {:?}", frame);
                    return Err(TransportError::Closed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::Io(e.to_string())),
                None => return Err(TransportError::Closed),
            }
        }
    }
}
