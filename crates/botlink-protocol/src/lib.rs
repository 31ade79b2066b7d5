//! Shared vocabulary for Botlink.
//!
//! This crate defines the types that every layer of the workspace speaks:
//!
//! - **Identity** ([`MemberId`]) — the numeric identifier the chat server
//!   assigns to each participant.
//! - **Records** ([`CharacterRecord`], [`RoomRecord`]) — structural views of
//!   the state the protocol client syncs from the server. Only the fields
//!   the coordinator interprets are typed; everything else passes through
//!   untouched.
//! - **Reply markers** ([`marker`]) — the literal sentinel strings the chat
//!   server broadcasts to signal the outcome of room operations.
//!
//! # Architecture
//!
//! The protocol crate sits below everything else. It doesn't know about
//! sessions, buffers, or the RPC façade — it only knows the shapes that
//! cross those boundaries.
//!
//! ```text
//! Client (external sync) → Protocol (records) → Runtime (session state)
//! ```

mod types;

pub use types::{CharacterRecord, MemberId, RoomRecord, marker};
