//! The [`ProtocolClient`] capability trait and its factory.
//!
//! Botlink defines WHAT a chat client must be able to do without caring HOW
//! it does it. This keeps the wire protocol, the authentication exchange,
//! and the room-state sync out of this repository entirely:
//!
//! - production embeds the real client library,
//! - tests use a scripted mock,
//!
//! and neither requires changing any runtime code.
//!
//! # Contract
//!
//! - Command methods (`send_chat`, `create_room`, ...) are fire-and-forget:
//!   they dispatch the request and return. The outcome — if the server
//!   reports one at all — arrives later as a [`ClientEvent`] broadcast.
//! - Accessors (`is_connected`, `player`, ...) are synchronous reads of the
//!   client's synced state. They must not block; the runtime calls them from
//!   status paths that are contractually non-blocking.
//! - All methods take `&self`: the client manages its own interior state so
//!   the runtime can share it across tasks behind an `Arc`.
//! - Async methods return `impl Future + Send` rather than plain `async fn`:
//!   the runtime awaits them from spawned tasks, which requires the futures
//!   to be `Send`. Implementations can still write `async fn`.

use std::collections::HashMap;

use botlink_protocol::{CharacterRecord, MemberId, RoomRecord};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{ClientError, ClientEvent};

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Everything a factory needs to construct a client for one session.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Account name to authenticate as.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Opaque appearance descriptor applied after login. Empty = server
    /// default.
    pub appearance: String,
    /// Chat server address.
    pub server_url: String,
    /// Origin identifier sent with the connection handshake.
    pub origin: String,
}

// ---------------------------------------------------------------------------
// ProtocolClient
// ---------------------------------------------------------------------------

/// The capability a chat-protocol client must provide.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` — the runtime shares the client across its
/// driving task, its event pump, and caller-facing command paths.
pub trait ProtocolClient: Send + Sync + 'static {
    /// Drives the connection: reads the socket, syncs state, fires
    /// [`ClientEvent`]s. Runs until the connection closes or the task is
    /// cancelled; cancellation is observed at the next await point.
    fn run(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Opens the server connection. Idempotent: a no-op when already
    /// connected.
    fn connect(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Starts the authentication exchange. The login *flag* flips later,
    /// when the server acknowledges — callers poll [`is_logged_in`]
    /// (`ProtocolClient::is_logged_in`) to observe completion.
    fn login(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Whether the server connection is established.
    fn is_connected(&self) -> bool;

    /// Whether the server has acknowledged authentication.
    fn is_logged_in(&self) -> bool;

    /// The bot's own synced player record.
    fn player(&self) -> CharacterRecord;

    /// Every other participant the client currently knows about, keyed by
    /// member identifier.
    fn others(&self) -> HashMap<MemberId, CharacterRecord>;

    /// The room the bot currently occupies, if any.
    fn current_room(&self) -> Option<RoomRecord>;

    /// Sends a chat message to the current room.
    fn send_chat(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Requests a room search. Results arrive as
    /// [`ClientEvent::RoomSearchResult`].
    fn search_rooms(
        &self,
        filters: &Value,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Requests room creation. The outcome arrives as
    /// [`ClientEvent::RoomCreateReply`]. Settings are passed through
    /// structurally, never validated here.
    fn create_room(
        &self,
        settings: &Value,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Requests to join the named room. The outcome arrives as
    /// [`ClientEvent::RoomJoinReply`].
    fn join_room(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Requests to leave the current room. Completion is observed through
    /// [`current_room`](ProtocolClient::current_room) clearing.
    fn leave_room(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Issues an account query. The answer arrives as
    /// [`ClientEvent::AccountQueryResult`].
    fn account_query(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}

// ---------------------------------------------------------------------------
// ClientFactory
// ---------------------------------------------------------------------------

/// Builds a fresh [`ProtocolClient`] for each session the coordinator
/// starts.
///
/// The factory receives the event sender so the client can forward its
/// callbacks from construction onward; the coordinator keeps the matching
/// receiver and drains it from its event pump.
pub trait ClientFactory: Send + Sync + 'static {
    /// The client type this factory produces.
    type Client: ProtocolClient;

    /// Constructs a client for one session. Infallible: connection and
    /// login failures surface later, from the driving task and the login
    /// gate.
    fn build(
        &self,
        config: ClientConfig,
        events: mpsc::UnboundedSender<ClientEvent>,
    ) -> Self::Client;
}
