//! The protocol-client capability boundary for Botlink.
//!
//! Botlink doesn't implement the chat wire protocol itself — that's the job
//! of an external client library. This crate defines the seam between the
//! two:
//!
//! 1. **Capability** — the [`ProtocolClient`] trait: what a client must be
//!    able to do (connect, login, issue room commands, expose synced state).
//! 2. **Construction** — the [`ClientFactory`] trait: how the coordinator
//!    obtains a fresh client for each session it starts.
//! 3. **Events** — the [`ClientEvent`] enum: protocol callbacks delivered as
//!    messages over an mpsc channel instead of subclass overrides, so the
//!    coordinator side has exactly one writer of derived state.
//!
//! # How it fits in the stack
//!
//! ```text
//! Runtime (above)   ← owns the session, pumps ClientEvents into buffers
//!     ↕
//! Client (this crate)  ← the trait seam; implementations live elsewhere
//!     ↕
//! Chat server (external)  ← wire protocol, auth, room-state sync
//! ```

mod client;
mod error;
mod events;

pub use client::{ClientConfig, ClientFactory, ProtocolClient};
pub use error::ClientError;
pub use events::ClientEvent;
