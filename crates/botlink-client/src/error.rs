//! Error type for the protocol-client boundary.

/// Errors a [`ProtocolClient`](crate::ProtocolClient) implementation may
/// surface to the coordinator.
///
/// The coordinator never lets these terminate the process: connect/login
/// faults are wrapped into the login gate's failure result, and command
/// faults become structured `ok: false` replies.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Establishing the server connection failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The authentication exchange failed outright (bad credentials,
    /// rejected appearance payload, server refusal).
    #[error("login failed: {0}")]
    Login(String),

    /// A fire-and-forget command could not be dispatched.
    #[error("send failed: {0}")]
    Send(String),

    /// The connection is gone; the driving task is unwinding.
    #[error("connection closed")]
    Closed,
}
