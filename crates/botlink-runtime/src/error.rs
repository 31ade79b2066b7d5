//! Error types for the session coordinator.
//!
//! Every variant here is an ordinary negative outcome, not a fault: the
//! façade converts them to structured `{ok: false, error}` results and the
//! process keeps running. The display strings are part of the remote
//! contract — callers match on them.

use botlink_client::ClientError;
use botlink_protocol::MemberId;

/// Errors the coordinator reports to callers.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// No live session exists for an operation that requires one.
    #[error("bot is not running")]
    NotRunning,

    /// Connect/login did not complete within the gate's timeout.
    #[error("login failed or timeout")]
    LoginTimeout,

    /// Connect or login raised an internal fault; the cause is surfaced
    /// rather than propagated.
    #[error("login error: {0}")]
    LoginFailed(String),

    /// A member identifier of zero is never valid.
    #[error("invalid member number")]
    InvalidMemberNumber,

    /// The session has no record of the requested member.
    #[error("member {0} not known to this session")]
    MemberNotFound(MemberId),

    /// The protocol client failed to dispatch a request.
    #[error(transparent)]
    Client(#[from] ClientError),
}
