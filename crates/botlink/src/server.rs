//! The WebSocket RPC listener.
//!
//! Accepts connections, upgrades them to WebSocket, and answers each JSON
//! frame with the matching response frame. All connections share one
//! [`BotCoordinator`] — the coordinator serializes what must be serialized;
//! the server just moves frames.

use std::sync::Arc;

use botlink_client::ClientFactory;
use botlink_runtime::BotCoordinator;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

use crate::BotlinkError;
use crate::rpc::{self, RpcRequest, RpcResponse};

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// A bound RPC server, ready to accept callers.
pub struct RpcServer<F: ClientFactory> {
    listener: TcpListener,
    coordinator: Arc<BotCoordinator<F>>,
}

impl<F: ClientFactory> RpcServer<F> {
    /// Binds the listener to `addr`.
    pub async fn bind(
        addr: &str,
        coordinator: Arc<BotCoordinator<F>>,
    ) -> Result<Self, BotlinkError> {
        let listener = TcpListener::bind(addr).await.map_err(BotlinkError::Bind)?;
        tracing::info!(addr, "RPC listener bound");
        Ok(Self {
            listener,
            coordinator,
        })
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Each connection gets its own task; a connection failing never takes
    /// down the listener. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), BotlinkError> {
        tracing::info!("RPC server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let coordinator = Arc::clone(&self.coordinator);
                    tokio::spawn(async move {
                        tracing::debug!(%peer, "accepted RPC connection");
                        if let Err(e) = handle_connection(stream, coordinator).await {
                            tracing::debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Handles a single connection from upgrade to close.
async fn handle_connection<F: ClientFactory>(
    stream: TcpStream,
    coordinator: Arc<BotCoordinator<F>>,
) -> Result<(), BotlinkError> {
    let mut ws: WsStream = tokio_tungstenite::accept_async(stream).await?;

    while let Some(msg) = ws.next().await {
        let frame = match msg? {
            Message::Text(text) => answer(&coordinator, text.as_bytes()).await?,
            Message::Binary(data) => answer(&coordinator, &data).await?,
            Message::Close(_) => break,
            // Tungstenite answers pings itself.
            _ => continue,
        };
        ws.send(frame).await?;
    }

    Ok(())
}

/// Decodes one request frame and produces the response frame.
async fn answer<F: ClientFactory>(
    coordinator: &BotCoordinator<F>,
    raw: &[u8],
) -> Result<Message, BotlinkError> {
    let response = match serde_json::from_slice::<RpcRequest>(raw) {
        Ok(request) => {
            tracing::debug!(method = %request.method, "dispatching request");
            rpc::dispatch(coordinator, request).await
        }
        Err(e) => RpcResponse {
            id: serde_json::Value::Null,
            result: json!({ "ok": false, "error": format!("invalid request: {e}") }),
        },
    };

    let body = serde_json::to_string(&response)?;
    Ok(Message::Text(body.into()))
}
