//! The session coordinator: owner of the single bot session.
//!
//! This is the central piece of the runtime. It's responsible for:
//! - Starting and stopping the session under mutual exclusion
//! - Gating room-affecting commands behind the login precondition
//! - Condition-waiting on broadcast replies with explicit timeouts
//! - Serving snapshots and buffered history to racing callers
//!
//! # Locking
//!
//! Two pieces of shared state, two different disciplines:
//!
//! - `lifecycle` (`tokio::sync::Mutex`) guards start/stop only. It can be
//!   held across awaits (task teardown), which is exactly why nothing on the
//!   status or command path is allowed to touch it — a slow teardown must
//!   never block a status poll.
//! - `current` (`std::sync::RwLock`) holds the session pointer. Held only
//!   long enough to clone an `Arc`, never across an await.

use std::sync::atomic::Ordering;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use botlink_client::{ClientConfig, ClientFactory, ProtocolClient};
use botlink_protocol::{CharacterRecord, MemberId, RoomRecord, marker};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::buffer::ChatRecord;
use crate::session::{ReplyKind, Session, pump_events};
use crate::snapshot::{self, StatusSnapshot};
use crate::wait::wait_until;
use crate::{CoordinatorError, gate};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing knobs for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long the login gate waits for authentication to complete.
    pub login_timeout: Duration,
    /// Interval between predicate polls (login flag, reply slots).
    pub poll_interval: Duration,
    /// Pause after connecting, before initiating login, so the handshake
    /// and initial state sync can land.
    pub connect_settle: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            login_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
            connect_settle: Duration::from_millis(500),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of a `start` request. Always `ok` — a start that finds a live
/// session is an idempotent no-op, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartOutcome {
    pub ok: bool,
    pub message: String,
    /// Present only on the idempotent "already running" path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_number: Option<MemberId>,
}

impl StartOutcome {
    fn started() -> Self {
        Self {
            ok: true,
            message: "bot started".into(),
            member_number: None,
        }
    }

    fn already_running(member_number: Option<MemberId>) -> Self {
        Self {
            ok: true,
            message: "bot already running".into(),
            member_number,
        }
    }
}

/// Result of a `stop` request. Always `ok` — stopping an idle coordinator
/// is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopOutcome {
    pub ok: bool,
    pub message: String,
}

impl StopOutcome {
    fn stopped() -> Self {
        Self {
            ok: true,
            message: "bot stopped".into(),
        }
    }

    fn not_running() -> Self {
        Self {
            ok: true,
            message: "bot is not running".into(),
        }
    }
}

/// Result of a command that waits for a broadcast reply.
///
/// `ok` means the expected terminal reply was observed within the timeout;
/// otherwise the raw reply (or its absence) is surfaced for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyOutcome {
    pub ok: bool,
    /// The raw reply the server broadcast, if any arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Value>,
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// A session paired with its driving tasks.
///
/// Liveness is a property of the driving task, not of the protocol flags: a
/// session whose connection collapsed is no longer live even though `stop`
/// was never called.
struct SessionHandle<C: ProtocolClient> {
    session: Arc<Session<C>>,
    driver: JoinHandle<()>,
    pump: JoinHandle<()>,
}

impl<C: ProtocolClient> SessionHandle<C> {
    fn is_live(&self) -> bool {
        !self.driver.is_finished()
    }
}

// ---------------------------------------------------------------------------
// BotCoordinator
// ---------------------------------------------------------------------------

/// Owns the lifecycle of exactly one bot session.
///
/// Constructed once at process start with a [`ClientFactory`]; every remote
/// operation the façade exposes is a method here.
///
/// ## Lifecycle
///
/// ```text
/// start() ──→ [session live] ──→ stop()
///    │              │               │
///    │   (start again: idempotent   │
///    │    "already running")        ▼
///    └──────────────────────→ [no session]
///                              (stop again: idempotent "not running")
/// ```
pub struct BotCoordinator<F: ClientFactory> {
    factory: F,
    config: CoordinatorConfig,
    /// Start/stop mutual exclusion. Never touched by status or commands.
    lifecycle: Mutex<Option<SessionHandle<F::Client>>>,
    /// Lock-free-in-practice session pointer for status and command paths;
    /// written only inside the `lifecycle` critical section.
    current: RwLock<Option<Arc<Session<F::Client>>>>,
}

impl<F: ClientFactory> BotCoordinator<F> {
    /// Creates a coordinator with default timing.
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, CoordinatorConfig::default())
    }

    /// Creates a coordinator with explicit timing knobs.
    pub fn with_config(factory: F, config: CoordinatorConfig) -> Self {
        Self {
            factory,
            config,
            lifecycle: Mutex::new(None),
            current: RwLock::new(None),
        }
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Starts the bot session, or reports the one already running.
    ///
    /// Returns immediately after spawning the driving task — it does NOT
    /// wait for the connection or login; the login gate handles that lazily
    /// on the first gated command.
    pub async fn start(&self, params: ClientConfig) -> StartOutcome {
        let mut lifecycle = self.lifecycle.lock().await;

        if let Some(handle) = lifecycle.as_ref() {
            if handle.is_live() {
                let member_number = handle.session.client.player().member_number;
                tracing::info!(?member_number, "start requested, session already live");
                return StartOutcome::already_running(member_number);
            }
        }
        // A handle whose driver already exited is stale; retire its pump
        // before building the replacement session.
        if let Some(stale) = lifecycle.take() {
            stale.pump.abort();
            reap(stale.pump, "event pump").await;
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let client = self.factory.build(params, events_tx);
        let session = Arc::new(Session::new(client));

        let driver = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                if let Err(e) = session.client.run().await {
                    tracing::warn!(error = %e, "session driver exited with error");
                }
                session.driver_done.store(true, Ordering::Release);
            }
        });
        let pump = tokio::spawn(pump_events(Arc::clone(&session), events_rx));

        self.set_session_ptr(Some(Arc::clone(&session)));
        *lifecycle = Some(SessionHandle {
            session,
            driver,
            pump,
        });

        tracing::info!("bot session started");
        StartOutcome::started()
    }

    /// Stops the bot session, or reports that none is running.
    ///
    /// Cancellation is cooperative: the driving task observes the abort at
    /// its next suspension point; the resulting cancellation is the expected
    /// shutdown signal and is swallowed, not reported.
    pub async fn stop(&self) -> StopOutcome {
        let mut lifecycle = self.lifecycle.lock().await;

        let Some(handle) = lifecycle.take() else {
            self.set_session_ptr(None);
            return StopOutcome::not_running();
        };

        if !handle.is_live() {
            // The driver already exited on its own; just clear the stale
            // references and reap the pump.
            self.set_session_ptr(None);
            handle.pump.abort();
            reap(handle.pump, "event pump").await;
            reap(handle.driver, "session driver").await;
            return StopOutcome::not_running();
        }

        handle.driver.abort();
        handle.pump.abort();
        reap(handle.driver, "session driver").await;
        reap(handle.pump, "event pump").await;
        self.set_session_ptr(None);

        tracing::info!("bot session stopped");
        StopOutcome::stopped()
    }

    /// A point-in-time snapshot of the session state.
    ///
    /// Never blocks and never takes the start/stop lock: a status poll must
    /// not queue behind a slow teardown or an in-flight room command.
    pub fn status(&self) -> StatusSnapshot {
        match self.session_ptr() {
            None => StatusSnapshot::not_running(),
            Some(session) => {
                let running = !session.driver_done.load(Ordering::Acquire);
                snapshot::build(&session, running)
            }
        }
    }

    // -- Gated commands ------------------------------------------------------

    /// Sends a chat message to the current room. Requires login; returns as
    /// soon as the message is dispatched, without waiting for delivery.
    pub async fn send_chat(&self, message: &str) -> Result<(), CoordinatorError> {
        let session = self.live_session()?;
        self.gate(&session).await?;
        session.client.send_chat(message).await?;
        Ok(())
    }

    /// Searches for rooms matching `filters`; waits up to `timeout` for the
    /// result broadcast. `ok` means a result list arrived.
    pub async fn search_rooms(
        &self,
        filters: Value,
        timeout: Duration,
    ) -> Result<ReplyOutcome, CoordinatorError> {
        let session = self.live_session()?;
        self.gate(&session).await?;

        session.shared.replies.clear(ReplyKind::RoomSearch);
        session.client.search_rooms(&filters).await?;
        self.await_reply(&session, ReplyKind::RoomSearch, timeout, None)
            .await
    }

    /// Creates a room with the given settings (structural pass-through);
    /// `ok` requires the reply to equal the room-created marker.
    pub async fn create_room(
        &self,
        settings: Value,
        timeout: Duration,
    ) -> Result<ReplyOutcome, CoordinatorError> {
        let session = self.live_session()?;
        self.gate(&session).await?;

        session.shared.replies.clear(ReplyKind::RoomCreate);
        session.client.create_room(&settings).await?;
        self.await_reply(
            &session,
            ReplyKind::RoomCreate,
            timeout,
            Some(marker::ROOM_CREATED),
        )
        .await
    }

    /// Joins the named room; `ok` requires the reply to equal the joined
    /// marker.
    pub async fn join_room(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<ReplyOutcome, CoordinatorError> {
        let session = self.live_session()?;
        self.gate(&session).await?;

        session.shared.replies.clear(ReplyKind::RoomJoin);
        session.client.join_room(name).await?;
        self.await_reply(
            &session,
            ReplyKind::RoomJoin,
            timeout,
            Some(marker::ROOM_JOINED),
        )
        .await
    }

    /// Leaves the current room. Requires only a live session — a bot stuck
    /// mid-login can still bail out of a room it was left in. Completion is
    /// the current-room record clearing.
    pub async fn leave_room(&self, timeout: Duration) -> Result<ReplyOutcome, CoordinatorError> {
        let session = self.live_session()?;

        session.client.leave_room().await?;
        let left = wait_until(
            || session.client.current_room().is_none(),
            self.config.poll_interval,
            timeout,
        )
        .await;

        Ok(ReplyOutcome {
            ok: left,
            reply: None,
        })
    }

    /// Issues an account query; `ok` means any answer arrived in time.
    pub async fn account_query(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<ReplyOutcome, CoordinatorError> {
        let session = self.live_session()?;
        self.gate(&session).await?;

        session.shared.replies.clear(ReplyKind::AccountQuery);
        session.client.account_query(query).await?;
        self.await_reply(&session, ReplyKind::AccountQuery, timeout, None)
            .await
    }

    // -- Read-only accessors -------------------------------------------------

    /// The most recent chat messages, newest `limit` of them in arrival
    /// order. `limit` clamps to `[1, 500]`.
    pub fn chat_history(&self, limit: usize) -> Result<Vec<ChatRecord>, CoordinatorError> {
        let session = self.live_session()?;
        Ok(session.shared.chat.recent(limit))
    }

    /// The most recent protocol events. `limit` clamps to `[1, 100]`.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<Value>, CoordinatorError> {
        let session = self.live_session()?;
        Ok(session.shared.events.recent(limit))
    }

    /// The full synced record for a member: the bot's own player record or
    /// a roster entry.
    pub fn character_data(&self, member_number: u64) -> Result<CharacterRecord, CoordinatorError> {
        let id = valid_member(member_number)?;
        let session = self.live_session()?;

        let player = session.client.player();
        if player.member_number == Some(id) {
            return Ok(player);
        }
        session
            .client
            .others()
            .remove(&id)
            .ok_or(CoordinatorError::MemberNotFound(id))
    }

    /// The roster record for another participant in the current room.
    /// Unlike [`character_data`](Self::character_data) this never answers
    /// with the bot's own record.
    pub fn room_member_detail(
        &self,
        member_number: u64,
    ) -> Result<CharacterRecord, CoordinatorError> {
        let id = valid_member(member_number)?;
        let session = self.live_session()?;

        session
            .client
            .others()
            .remove(&id)
            .ok_or(CoordinatorError::MemberNotFound(id))
    }

    /// The current room record, if the bot is in one.
    pub fn current_room(&self) -> Result<Option<RoomRecord>, CoordinatorError> {
        let session = self.live_session()?;
        Ok(session.client.current_room())
    }

    // -- Internals -------------------------------------------------------------

    /// The live session, or `NotRunning` when none exists or its driver has
    /// already exited.
    fn live_session(&self) -> Result<Arc<Session<F::Client>>, CoordinatorError> {
        match self.session_ptr() {
            Some(session) if !session.driver_done.load(Ordering::Acquire) => Ok(session),
            _ => Err(CoordinatorError::NotRunning),
        }
    }

    fn session_ptr(&self) -> Option<Arc<Session<F::Client>>> {
        self.current
            .read()
            .expect("session pointer lock poisoned")
            .clone()
    }

    fn set_session_ptr(&self, session: Option<Arc<Session<F::Client>>>) {
        *self.current.write().expect("session pointer lock poisoned") = session;
    }

    async fn gate(&self, session: &Session<F::Client>) -> Result<(), CoordinatorError> {
        gate::ensure_logged_in(
            session,
            self.config.login_timeout,
            self.config.poll_interval,
            self.config.connect_settle,
        )
        .await
    }

    /// Condition-waits on a reply slot and derives the outcome.
    ///
    /// With `expected`, success means the reply literal matches; without,
    /// any reply within the timeout counts.
    async fn await_reply(
        &self,
        session: &Session<F::Client>,
        kind: ReplyKind,
        timeout: Duration,
        expected: Option<&str>,
    ) -> Result<ReplyOutcome, CoordinatorError> {
        wait_until(
            || session.shared.replies.get(kind).is_some(),
            self.config.poll_interval,
            timeout,
        )
        .await;

        let reply = session.shared.replies.get(kind);
        let ok = match expected {
            Some(expected) => reply.as_ref().and_then(Value::as_str) == Some(expected),
            None => reply.is_some(),
        };
        Ok(ReplyOutcome { ok, reply })
    }
}

/// Awaits a cancelled task, treating the cancellation as normal shutdown.
/// A panic inside the task is still worth a log line.
async fn reap(handle: JoinHandle<()>, what: &str) {
    if let Err(e) = handle.await {
        if !e.is_cancelled() {
            tracing::warn!(task = what, error = %e, "task ended abnormally");
        }
    }
}

fn valid_member(member_number: u64) -> Result<MemberId, CoordinatorError> {
    if member_number == 0 {
        return Err(CoordinatorError::InvalidMemberNumber);
    }
    Ok(MemberId(member_number))
}
