//! Session state: the client, its derived state, and the event pump.
//!
//! A [`Session`] bundles the protocol client with everything the coordinator
//! derives from its callbacks: the bounded buffers and the last-reply slots.
//!
//! # Single-writer invariant
//!
//! Derived state is written from exactly one place — the event pump task
//! draining the client's event channel. Coordinator methods and snapshot
//! callers only read. Each slot update is a single assignment behind its own
//! lock, so a concurrent reader sees either the old value or the new one,
//! never a torn mix.

use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use botlink_client::{ClientEvent, ProtocolClient};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::buffer::{BoundedLog, ChatLog, EVENT_CAPACITY};

// ---------------------------------------------------------------------------
// ReplyBoard
// ---------------------------------------------------------------------------

/// The reply kinds the chat server broadcasts in answer to commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyKind {
    AccountQuery,
    RoomSearch,
    RoomJoin,
    RoomCreate,
}

/// One "last reply" slot per reply kind.
///
/// A command clears its slot before dispatching, then condition-waits for
/// the pump to fill it. There is no correlation token — the slot holds
/// whatever the server broadcast most recently for that kind, which is
/// exactly the guarantee the upstream protocol offers.
#[derive(Debug, Default)]
pub(crate) struct ReplyBoard {
    account_query: Mutex<Option<Value>>,
    room_search: Mutex<Option<Value>>,
    room_join: Mutex<Option<Value>>,
    room_create: Mutex<Option<Value>>,
}

impl ReplyBoard {
    fn slot(&self, kind: ReplyKind) -> &Mutex<Option<Value>> {
        match kind {
            ReplyKind::AccountQuery => &self.account_query,
            ReplyKind::RoomSearch => &self.room_search,
            ReplyKind::RoomJoin => &self.room_join,
            ReplyKind::RoomCreate => &self.room_create,
        }
    }

    /// Empties a slot ahead of a new request.
    pub(crate) fn clear(&self, kind: ReplyKind) {
        *self.slot(kind).lock().expect("reply slot poisoned") = None;
    }

    /// Records the latest reply of this kind. Pump-only.
    pub(crate) fn record(&self, kind: ReplyKind, value: Value) {
        *self.slot(kind).lock().expect("reply slot poisoned") = Some(value);
    }

    /// Copies the current reply, if any.
    pub(crate) fn get(&self, kind: ReplyKind) -> Option<Value> {
        self.slot(kind).lock().expect("reply slot poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State derived from the client's event stream.
#[derive(Debug)]
pub(crate) struct SessionShared {
    /// Raw protocol events, most recent 100.
    pub(crate) events: BoundedLog<Value>,
    /// Chat messages with receipt timestamps, most recent 500.
    pub(crate) chat: ChatLog,
    /// Last-reply slots consumed by the condition waits.
    pub(crate) replies: ReplyBoard,
}

/// The single owned bot session: the protocol client plus derived state.
///
/// Created by `start`, destroyed by `stop`; at most one instance is live per
/// coordinator. Shared across the driving task, the event pump, and caller
/// paths behind an `Arc`.
pub(crate) struct Session<C: ProtocolClient> {
    pub(crate) client: C,
    pub(crate) shared: SessionShared,
    /// Set by the wrapper around the driving task when it exits, so status
    /// paths can detect a dead session without holding its join handle.
    pub(crate) driver_done: AtomicBool,
    /// Ensures the login exchange is initiated at most once while an
    /// attempt is outstanding.
    pub(crate) login_started: AtomicBool,
}

impl<C: ProtocolClient> Session<C> {
    pub(crate) fn new(client: C) -> Self {
        Self {
            client,
            shared: SessionShared {
                events: BoundedLog::new(EVENT_CAPACITY),
                chat: ChatLog::new(),
                replies: ReplyBoard::default(),
            },
            driver_done: AtomicBool::new(false),
            login_started: AtomicBool::new(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Event pump
// ---------------------------------------------------------------------------

/// Drains the client's event channel into the session's derived state.
///
/// Runs until the channel closes (client dropped) or the task is cancelled
/// during `stop`. This task is the sole writer of buffers and reply slots.
pub(crate) async fn pump_events<C: ProtocolClient>(
    session: std::sync::Arc<Session<C>>,
    mut events: mpsc::UnboundedReceiver<ClientEvent>,
) {
    while let Some(event) = events.recv().await {
        apply_event(&session.shared, event);
    }
    tracing::debug!("event pump stopped (channel closed)");
}

fn apply_event(shared: &SessionShared, event: ClientEvent) {
    match event {
        ClientEvent::Protocol(value) => shared.events.push(value),
        ClientEvent::ChatMessage(value) => shared.chat.push(value),
        ClientEvent::AccountQueryResult(value) => {
            shared.replies.record(ReplyKind::AccountQuery, value);
        }
        ClientEvent::RoomSearchResult(value) => {
            shared.replies.record(ReplyKind::RoomSearch, value);
        }
        ClientEvent::RoomJoinReply(value) => {
            shared.replies.record(ReplyKind::RoomJoin, value);
        }
        ClientEvent::RoomCreateReply(value) => {
            shared.replies.record(ReplyKind::RoomCreate, value);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shared() -> SessionShared {
        SessionShared {
            events: BoundedLog::new(EVENT_CAPACITY),
            chat: ChatLog::new(),
            replies: ReplyBoard::default(),
        }
    }

    #[test]
    fn test_apply_event_routes_protocol_events_to_event_log() {
        let shared = shared();
        apply_event(&shared, ClientEvent::Protocol(json!({"kind": "hello"})));
        assert_eq!(shared.events.len(), 1);
        assert!(shared.chat.is_empty());
    }

    #[test]
    fn test_apply_event_routes_chat_to_chat_log_with_timestamp() {
        let shared = shared();
        apply_event(&shared, ClientEvent::ChatMessage(json!({"Content": "hi"})));
        let records = shared.chat.recent(1);
        assert_eq!(records.len(), 1);
        assert!(records[0].received_at_ms > 0);
        assert!(shared.events.is_empty());
    }

    #[test]
    fn test_apply_event_fills_matching_reply_slot_only() {
        let shared = shared();
        apply_event(&shared, ClientEvent::RoomCreateReply(json!("ChatRoomCreated")));

        assert_eq!(
            shared.replies.get(ReplyKind::RoomCreate),
            Some(json!("ChatRoomCreated"))
        );
        assert_eq!(shared.replies.get(ReplyKind::RoomJoin), None);
        assert_eq!(shared.replies.get(ReplyKind::RoomSearch), None);
        assert_eq!(shared.replies.get(ReplyKind::AccountQuery), None);
    }

    #[test]
    fn test_reply_board_clear_then_record_overwrites() {
        let board = ReplyBoard::default();
        board.record(ReplyKind::RoomJoin, json!("stale"));
        board.clear(ReplyKind::RoomJoin);
        assert_eq!(board.get(ReplyKind::RoomJoin), None);

        board.record(ReplyKind::RoomJoin, json!("JoinedRoom"));
        assert_eq!(board.get(ReplyKind::RoomJoin), Some(json!("JoinedRoom")));
    }
}
