//! Protocol callbacks as messages.
//!
//! The upstream chat server answers requests by broadcast — there is no
//! per-request correlation token. A client implementation therefore doesn't
//! "return" replies; it forwards every named callback as a [`ClientEvent`]
//! on the channel it was given at construction. The coordinator's event pump
//! is the only consumer, which makes it the only writer of the buffers and
//! reply slots derived from these events.

use serde_json::Value;

/// One protocol callback, forwarded from the client's driving task.
///
/// Payloads are structural pass-throughs: the coordinator stores or matches
/// them but never validates their shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A generic server event. Appended to the bounded event buffer.
    Protocol(Value),

    /// A chat message received in the current room. Appended to the chat
    /// buffer with a receipt timestamp.
    ChatMessage(Value),

    /// The server's answer to an account query.
    AccountQueryResult(Value),

    /// The server's answer to a room search (a list of room summaries).
    RoomSearchResult(Value),

    /// The terminal reply to a join attempt. Equals
    /// [`marker::ROOM_JOINED`](botlink_protocol::marker::ROOM_JOINED) on
    /// success, an error literal otherwise.
    RoomJoinReply(Value),

    /// The terminal reply to a create attempt. Equals
    /// [`marker::ROOM_CREATED`](botlink_protocol::marker::ROOM_CREATED) on
    /// success, an error literal otherwise.
    RoomCreateReply(Value),
}
