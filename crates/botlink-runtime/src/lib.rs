//! Single-session coordination for Botlink.
//!
//! This crate owns the lifecycle of exactly one bot session and everything
//! that makes that safe under concurrency:
//!
//! 1. **Lifecycle** — [`BotCoordinator`] starts and stops the session under
//!    a dedicated mutex, so two racing `start` calls can never construct two
//!    sessions.
//! 2. **Gating** — every room-affecting command passes the login gate: the
//!    session must be connected and authenticated before the request goes
//!    out.
//! 3. **Waiting** — the chat server answers by broadcast, without request
//!    correlation. Commands watch the reply slot the event pump writes into,
//!    via a generic timeout-bounded predicate poll ([`wait_until`]).
//! 4. **Snapshotting** — [`StatusSnapshot`]s are composed in one pass and
//!    returned by value, so callers racing the background session never see
//!    a torn read.
//!
//! # How it fits in the stack
//!
//! ```text
//! Façade (above)   ← maps named remote procedures onto coordinator methods
//!     ↕
//! Runtime (this crate)  ← session lifecycle, gating, buffers, snapshots
//!     ↕
//! Client (below)   ← the external protocol client behind a trait seam
//! ```

mod buffer;
mod coordinator;
mod error;
mod gate;
mod session;
mod snapshot;
mod wait;

pub use buffer::{BoundedLog, CHAT_CAPACITY, ChatLog, ChatRecord, EVENT_CAPACITY};
pub use coordinator::{
    BotCoordinator, CoordinatorConfig, ReplyOutcome, StartOutcome, StopOutcome,
};
pub use error::CoordinatorError;
pub use snapshot::{MemberSummary, StatusSnapshot};
pub use wait::wait_until;
