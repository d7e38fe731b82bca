use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use switchboard_core::{CorrelationId, Envelope};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::mock_peer::FRAME_TIMEOUT_MS;

/// Backend peer connected to a running relay over a real WebSocket.
pub struct WsPeer {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsPeer {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (socket, _) = connect_async(format!("ws://{addr}/ws"))
            .await
            .context("Failed to connect to relay")?;
        Ok(Self { socket })
    }

    pub async fn next_envelope(&mut self) -> Result<Envelope> {
        loop {
            let msg = tokio::time::timeout(
                Duration::from_millis(FRAME_TIMEOUT_MS),
                self.socket.next(),
            )
            .await
            .context("Timeout waiting for envelope")?;

            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Envelope::decode(text.as_str().as_bytes())
                        .context("Relay sent a malformed envelope");
                }
                // Envelopes are JSON text and must arrive as text frames.
                Some(Ok(Message::Binary(_))) => bail!("Relay sent an envelope as a binary frame"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => bail!("WebSocket error: {e}"),
                None => bail!("Relay closed the connection"),
            }
        }
    }

    pub async fn reply(&mut self, id: &CorrelationId, payload: Vec<u8>) -> Result<()> {
        let frame = Envelope::new(id.clone(), payload.into()).encode()?;
        let text = String::from_utf8(frame.to_vec())?;
        self.socket.send(Message::Text(text.into())).await?;
        Ok(())
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}
