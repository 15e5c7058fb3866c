//! Push transport seam and its websocket implementation.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::error::ClientError;

/// What a live link reports upward. `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFrame {
    Text(String),
    Closed,
    Failed(String),
}

/// An open link: text frames go out through `outbound`, frames come back on `inbound`.
///
/// Dropping `outbound` closes the link.
#[derive(Debug)]
pub struct TransportLink {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<TransportFrame>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a link to `url`. Resolves once the handshake completes.
    async fn connect(&self, url: &str) -> Result<TransportLink, ClientError>;
}

/// Websocket transport on tokio-tungstenite.
#[derive(Debug, Default, Clone)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, url: &str) -> Result<TransportLink, ClientError> {
        let (stream, _) = connect_async(url).await?;
        let (mut sink, mut stream) = stream.split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<TransportFrame>();

        let writer_in_tx = in_tx.clone();
        tokio::spawn(async move {
            while let Some(text) = out_rx.recv().await {
                if let Err(e) = sink.send(Message::text(text)).await {
                    warn!(error = %e, "[WS LINK] write failed");
                    let _ = writer_in_tx.send(TransportFrame::Failed(e.to_string()));
                    return;
                }
            }
            debug!("[WS LINK] outbound dropped, closing");
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            let terminal = loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        if in_tx.send(TransportFrame::Text(text.as_str().to_owned())).is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => {
                            if in_tx.send(TransportFrame::Text(text)).is_err() {
                                return;
                            }
                        }
                        Err(_) => debug!(len = bytes.len(), "[WS LINK] ignoring non-utf8 binary frame"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "[WS LINK] close frame received");
                        break TransportFrame::Closed;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break TransportFrame::Failed(e.to_string()),
                    None => break TransportFrame::Closed,
                }
            };
            let _ = in_tx.send(terminal);
        });

        Ok(TransportLink {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}
