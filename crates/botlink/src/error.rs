//! Unified error type for the Botlink façade.

use botlink_client::ClientError;
use botlink_runtime::CoordinatorError;

/// Top-level error that wraps the sub-crate errors plus the façade's own
/// transport faults.
///
/// When embedding the `botlink` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attributes
/// auto-generate `From` impls, so the `?` operator converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BotlinkError {
    /// A coordinator-level error (not running, login, member lookup).
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    /// A protocol-client fault that surfaced outside the coordinator.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The listener could not bind to the configured address.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// A WebSocket-level fault (handshake, send, receive).
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A response could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
