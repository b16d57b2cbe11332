//! Channel Transport Module
//!
//! Bridges the push channel's supervisor to a message-oriented
//! connection. A connection is a pair of mpsc endpoints carrying text
//! frames; the inbound receiver closing is the one and only drop signal
//! the supervisor reacts to.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::error::{ChannelError, Result};

/// Frames buffered per direction before backpressure kicks in.
const FRAME_BUFFER: usize = 32;

// == Transport Pipe ==
/// One live connection, seen from the client side.
///
/// All sends are serialized through the single `outbound` sender; no
/// other path may write to the underlying socket.
pub struct TransportPipe {
    /// Frames from client to server
    pub outbound: mpsc::Sender<String>,
    /// Frames from server to client; `None` means the connection dropped
    pub inbound: mpsc::Receiver<String>,
}

// == Transport Trait ==
/// Connection factory the push client is generic over.
///
/// Connections are not reused across reconnects: every reconnect asks
/// the transport for a fresh pipe.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self) -> Result<TransportPipe>;
}

// == Endpoint Selection ==
/// Builds the channel endpoint for a host, mirroring the page's own
/// scheme: secure pages talk `wss`, plain pages talk `ws`.
pub fn endpoint_url(host: &str, secure: bool) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{}://{}/ws", scheme, host)
}

// == WebSocket Transport ==
/// Production transport over a persistent WebSocket connection.
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Convenience constructor from host + scheme selection.
    pub fn for_host(host: &str, secure: bool) -> Self {
        Self::new(endpoint_url(host, secure))
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self) -> Result<TransportPipe> {
        let (ws, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        let (mut sink, mut stream) = ws.split();
        let (out_tx, mut out_rx) = mpsc::channel::<String>(FRAME_BUFFER);
        let (in_tx, in_rx) = mpsc::channel::<String>(FRAME_BUFFER);

        // Writer: drains the outbound queue into the socket. The queue
        // closing (client teardown) closes the socket cleanly.
        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                if let Err(e) = sink.send(Message::Text(frame)).await {
                    warn!(error = %e, "websocket send failed");
                    break;
                }
            }
            let _ = sink.send(Message::Close(None)).await;
        });

        // Reader: forwards text frames inbound. Dropping `in_tx` when
        // the socket closes is what signals the drop to the supervisor.
        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if in_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("websocket closed by server");
                        break;
                    }
                    // Ping/pong is handled by the protocol layer.
                    Ok(_) => {}
                    Err(e) => {
                        debug!(error = %e, "websocket read error");
                        break;
                    }
                }
            }
        });

        Ok(TransportPipe {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}
