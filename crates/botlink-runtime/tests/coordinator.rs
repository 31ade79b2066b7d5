//! Integration tests for the session coordinator: lifecycle, gating,
//! reply waits, and snapshot consistency against a scripted mock client.
//!
//! All timing-sensitive tests run with `start_paused` so Tokio auto-advances
//! the clock: poll intervals and timeouts resolve instantly and
//! deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use botlink_client::{ClientConfig, ClientError, ClientEvent, ClientFactory, ProtocolClient};
use botlink_protocol::{CharacterRecord, MemberId, RoomRecord, marker};
use botlink_runtime::{BotCoordinator, CoordinatorError};
use serde_json::{Value, json};
use tokio::sync::mpsc;

// =========================================================================
// Mock protocol client
// =========================================================================

/// Scripted behavior for a mock client, fixed at construction.
#[derive(Clone)]
struct MockBehavior {
    start_connected: bool,
    start_logged_in: bool,
    /// Whether `login()` flips the logged-in flag. `false` simulates a
    /// server that never acknowledges, so gate waits time out.
    login_completes: bool,
    /// Attempt number (1-based) from which `login()` acknowledges, when
    /// `login_completes` is true. Values above 1 make earlier attempts
    /// go unanswered.
    login_acks_from_attempt: usize,
    connect_fails: bool,
    player: CharacterRecord,
    others: HashMap<MemberId, CharacterRecord>,
    room: Option<RoomRecord>,
    search_reply: Option<Value>,
    create_reply: Option<Value>,
    join_reply: Option<Value>,
    account_reply: Option<Value>,
    leave_clears_room: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            start_connected: false,
            start_logged_in: false,
            login_completes: true,
            login_acks_from_attempt: 1,
            connect_fails: false,
            player: CharacterRecord::new(None, ""),
            others: HashMap::new(),
            room: None,
            search_reply: None,
            create_reply: None,
            join_reply: None,
            account_reply: None,
            leave_clears_room: true,
        }
    }
}

/// Observable state of one built mock client. Tests keep an `Arc` to poke
/// flags and inject events after the coordinator has taken ownership.
struct MockState {
    behavior: MockBehavior,
    connected: AtomicBool,
    logged_in: AtomicBool,
    connect_calls: AtomicUsize,
    login_calls: AtomicUsize,
    sent_chat: Mutex<Vec<String>>,
    room: Mutex<Option<RoomRecord>>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl MockState {
    fn send(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

struct MockClient {
    state: Arc<MockState>,
}

impl ProtocolClient for MockClient {
    async fn run(&self) -> Result<(), ClientError> {
        // The real driving loop reads the socket forever; the mock just
        // parks until the coordinator aborts it.
        std::future::pending::<Result<(), ClientError>>().await
    }

    async fn connect(&self) -> Result<(), ClientError> {
        self.state.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.behavior.connect_fails {
            return Err(ClientError::Connect("connection refused".into()));
        }
        self.state.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self) -> Result<(), ClientError> {
        let attempt = self.state.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.state.behavior.login_completes
            && attempt >= self.state.behavior.login_acks_from_attempt
        {
            self.state.logged_in.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    fn is_logged_in(&self) -> bool {
        self.state.logged_in.load(Ordering::SeqCst)
    }

    fn player(&self) -> CharacterRecord {
        self.state.behavior.player.clone()
    }

    fn others(&self) -> HashMap<MemberId, CharacterRecord> {
        self.state.behavior.others.clone()
    }

    fn current_room(&self) -> Option<RoomRecord> {
        self.state.room.lock().unwrap().clone()
    }

    async fn send_chat(&self, message: &str) -> Result<(), ClientError> {
        self.state.sent_chat.lock().unwrap().push(message.into());
        Ok(())
    }

    async fn search_rooms(&self, _filters: &Value) -> Result<(), ClientError> {
        if let Some(reply) = self.state.behavior.search_reply.clone() {
            self.state.send(ClientEvent::RoomSearchResult(reply));
        }
        Ok(())
    }

    async fn create_room(&self, _settings: &Value) -> Result<(), ClientError> {
        if let Some(reply) = self.state.behavior.create_reply.clone() {
            self.state.send(ClientEvent::RoomCreateReply(reply));
        }
        Ok(())
    }

    async fn join_room(&self, _name: &str) -> Result<(), ClientError> {
        if let Some(reply) = self.state.behavior.join_reply.clone() {
            self.state.send(ClientEvent::RoomJoinReply(reply));
        }
        Ok(())
    }

    async fn leave_room(&self) -> Result<(), ClientError> {
        if self.state.behavior.leave_clears_room {
            *self.state.room.lock().unwrap() = None;
        }
        Ok(())
    }

    async fn account_query(&self, _query: &str) -> Result<(), ClientError> {
        if let Some(reply) = self.state.behavior.account_reply.clone() {
            self.state.send(ClientEvent::AccountQueryResult(reply));
        }
        Ok(())
    }
}

/// Builds mock clients from a behavior template and records every built
/// client's state for later inspection.
struct MockFactory {
    behavior: MockBehavior,
    built: Arc<Mutex<Vec<Arc<MockState>>>>,
}

impl ClientFactory for MockFactory {
    type Client = MockClient;

    fn build(
        &self,
        _config: ClientConfig,
        events: mpsc::UnboundedSender<ClientEvent>,
    ) -> MockClient {
        let state = Arc::new(MockState {
            behavior: self.behavior.clone(),
            connected: AtomicBool::new(self.behavior.start_connected),
            logged_in: AtomicBool::new(self.behavior.start_logged_in),
            connect_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            sent_chat: Mutex::new(Vec::new()),
            room: Mutex::new(self.behavior.room.clone()),
            events,
        });
        self.built.lock().unwrap().push(Arc::clone(&state));
        MockClient { state }
    }
}

// =========================================================================
// Helpers
// =========================================================================

type Built = Arc<Mutex<Vec<Arc<MockState>>>>;

fn coordinator(behavior: MockBehavior) -> (BotCoordinator<MockFactory>, Built) {
    let built: Built = Arc::new(Mutex::new(Vec::new()));
    let factory = MockFactory {
        behavior,
        built: Arc::clone(&built),
    };
    (BotCoordinator::new(factory), built)
}

fn params() -> ClientConfig {
    ClientConfig {
        username: "echo".into(),
        password: "secret".into(),
        ..ClientConfig::default()
    }
}

fn last_state(built: &Built) -> Arc<MockState> {
    Arc::clone(built.lock().unwrap().last().expect("no client built"))
}

/// Polls a condition until it holds, yielding between attempts. Used to let
/// the event pump catch up after injecting events.
async fn settle_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never settled");
}

// =========================================================================
// Lifecycle: start / stop / status
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_status_before_start_is_exactly_running_false() {
    let (coord, _) = coordinator(MockBehavior::default());

    let status = coord.status();

    assert!(!status.running);
    assert_eq!(
        serde_json::to_value(&status).unwrap(),
        json!({ "running": false }),
        "no-session status must carry no other keys"
    );
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_idempotent_with_member_number() {
    let (coord, built) = coordinator(MockBehavior {
        player: CharacterRecord::new(MemberId(4242), "Echo"),
        ..MockBehavior::default()
    });

    let first = coord.start(params()).await;
    assert!(first.ok);
    assert_eq!(first.message, "bot started");
    assert_eq!(first.member_number, None);

    let second = coord.start(params()).await;
    assert!(second.ok);
    assert_eq!(second.message, "bot already running");
    assert_eq!(second.member_number, Some(MemberId(4242)));

    assert_eq!(built.lock().unwrap().len(), 1, "only one client built");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_starts_create_exactly_one_session() {
    let (coord, built) = coordinator(MockBehavior::default());
    let coord = Arc::new(coord);

    let a = tokio::spawn({
        let coord = Arc::clone(&coord);
        async move { coord.start(params()).await }
    });
    let b = tokio::spawn({
        let coord = Arc::clone(&coord);
        async move { coord.start(params()).await }
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert!(a.ok && b.ok);
    let messages = [a.message.as_str(), b.message.as_str()];
    assert!(messages.contains(&"bot started"));
    assert!(messages.contains(&"bot already running"));
    assert_eq!(built.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_start_is_idempotent() {
    let (coord, _) = coordinator(MockBehavior::default());

    let first = coord.stop().await;
    assert!(first.ok);
    assert_eq!(first.message, "bot is not running");

    // Twice in a row never double-frees or errors.
    let second = coord.stop().await;
    assert!(second.ok);
    assert_eq!(second.message, "bot is not running");
}

#[tokio::test(start_paused = true)]
async fn test_stop_tears_down_then_reports_not_running() {
    let (coord, _) = coordinator(MockBehavior::default());
    coord.start(params()).await;

    let stopped = coord.stop().await;
    assert!(stopped.ok);
    assert_eq!(stopped.message, "bot stopped");
    assert!(!coord.status().running);

    let again = coord.stop().await;
    assert_eq!(again.message, "bot is not running");
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_builds_a_fresh_client() {
    let (coord, built) = coordinator(MockBehavior::default());

    coord.start(params()).await;
    coord.stop().await;
    let outcome = coord.start(params()).await;

    assert_eq!(outcome.message, "bot started");
    assert_eq!(built.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_status_reflects_live_session_fields() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        player: CharacterRecord::new(MemberId(7), "Echo"),
        room: Some(RoomRecord::named("Lobby")),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let status = coord.status();

    assert!(status.running);
    assert_eq!(status.connected, Some(true));
    assert_eq!(status.logged_in, Some(true));
    assert_eq!(status.chatroom.as_deref(), Some("Lobby"));
    assert_eq!(status.player.as_ref().unwrap().name, "Echo");
    assert_eq!(status.member_count, Some(0));
    assert_eq!(status.recent_event_count, Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_status_members_sorted_ascending_absent_first() {
    let mut others = HashMap::new();
    others.insert(MemberId(30), CharacterRecord::new(MemberId(30), "cleo"));
    others.insert(MemberId(10), CharacterRecord::new(MemberId(10), "ada"));
    // A roster entry the server hasn't numbered yet sorts first.
    others.insert(MemberId(99), CharacterRecord::new(None, "anon"));

    let (coord, _) = coordinator(MockBehavior {
        others,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let status = coord.status();
    let names: Vec<String> = status
        .members
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();

    assert_eq!(names, ["anon", "ada", "cleo"]);
    assert_eq!(status.member_count, Some(3));
}

// =========================================================================
// Login gate
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_send_chat_not_running_fails_without_login_attempt() {
    let (coord, built) = coordinator(MockBehavior::default());

    let err = coord.send_chat("hello").await.unwrap_err();

    assert!(matches!(err, CoordinatorError::NotRunning));
    assert_eq!(err.to_string(), "bot is not running");
    assert!(built.lock().unwrap().is_empty(), "no client ever built");
}

#[tokio::test(start_paused = true)]
async fn test_send_chat_connects_logs_in_then_dispatches() {
    let (coord, built) = coordinator(MockBehavior::default());
    coord.start(params()).await;

    coord.send_chat("hello room").await.unwrap();

    let state = last_state(&built);
    assert_eq!(state.connect_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*state.sent_chat.lock().unwrap(), vec!["hello room"]);
}

#[tokio::test(start_paused = true)]
async fn test_gate_fast_path_skips_connect_and_login() {
    let (coord, built) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    coord.send_chat("hi").await.unwrap();

    let state = last_state(&built);
    assert_eq!(state.connect_calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_gate_times_out_when_login_never_acknowledged() {
    let (coord, built) = coordinator(MockBehavior {
        login_completes: false,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let err = coord.send_chat("hello").await.unwrap_err();

    assert!(matches!(err, CoordinatorError::LoginTimeout));
    assert_eq!(err.to_string(), "login failed or timeout");
    // The exchange was initiated exactly once despite all the polling.
    assert_eq!(last_state(&built).login_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_gate_reinitiates_login_after_timeout() {
    // The first attempt goes unanswered; a timed-out gate must hand the
    // next caller a fresh attempt instead of re-polling a dead one.
    let (coord, built) = coordinator(MockBehavior {
        login_acks_from_attempt: 2,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let err = coord.send_chat("first").await.unwrap_err();
    assert!(matches!(err, CoordinatorError::LoginTimeout));

    // Second call re-initiates; this time the server acknowledges.
    coord.send_chat("second").await.unwrap();

    let state = last_state(&built);
    assert_eq!(state.login_calls.load(Ordering::SeqCst), 2);
    assert_eq!(*state.sent_chat.lock().unwrap(), vec!["second"]);
}

#[tokio::test(start_paused = true)]
async fn test_gate_wraps_connect_fault_as_login_error() {
    let (coord, _) = coordinator(MockBehavior {
        connect_fails: true,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let err = coord.send_chat("hello").await.unwrap_err();

    assert!(matches!(err, CoordinatorError::LoginFailed(_)));
    assert_eq!(
        err.to_string(),
        "login error: connect failed: connection refused"
    );
}

#[tokio::test(start_paused = true)]
async fn test_gate_initiates_login_once_across_concurrent_commands() {
    let (coord, built) = coordinator(MockBehavior::default());
    let coord = Arc::new(coord);
    coord.start(params()).await;

    let a = tokio::spawn({
        let coord = Arc::clone(&coord);
        async move { coord.send_chat("one").await }
    });
    let b = tokio::spawn({
        let coord = Arc::clone(&coord);
        async move { coord.send_chat("two").await }
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let state = last_state(&built);
    assert_eq!(state.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.sent_chat.lock().unwrap().len(), 2);
}

// =========================================================================
// Reply-waiting commands
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_room_ok_on_created_marker() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        create_reply: Some(json!(marker::ROOM_CREATED)),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord
        .create_room(json!({ "Name": "Lobby", "Limit": 10 }), Duration::from_secs(5))
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.reply, Some(json!(marker::ROOM_CREATED)));
}

#[tokio::test(start_paused = true)]
async fn test_create_room_non_matching_reply_is_not_ok_but_surfaced() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        create_reply: Some(json!("RoomAlreadyExist")),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord
        .create_room(json!({ "Name": "Lobby" }), Duration::from_secs(5))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.reply, Some(json!("RoomAlreadyExist")));
}

#[tokio::test(start_paused = true)]
async fn test_join_room_ok_on_joined_marker() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        join_reply: Some(json!(marker::ROOM_JOINED)),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord
        .join_room("Lobby", Duration::from_secs(5))
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.reply, Some(json!(marker::ROOM_JOINED)));
}

#[tokio::test(start_paused = true)]
async fn test_join_room_without_reply_fails_only_after_timeout() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        join_reply: None,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let before = tokio::time::Instant::now();
    let outcome = coord
        .join_room("Nowhere", Duration::from_secs(3))
        .await
        .unwrap();
    let elapsed = tokio::time::Instant::now() - before;

    assert!(!outcome.ok);
    assert_eq!(outcome.reply, None);
    assert!(
        elapsed >= Duration::from_secs(3),
        "must not give up before the timeout: {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_join_room_reply_arriving_midwait_succeeds() {
    let (coord, built) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        join_reply: None,
        ..MockBehavior::default()
    });
    coord.start(params()).await;
    let state = last_state(&built);

    let injector = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        state.send(ClientEvent::RoomJoinReply(json!(marker::ROOM_JOINED)));
    });

    let outcome = coord
        .join_room("Lobby", Duration::from_secs(10))
        .await
        .unwrap();
    injector.await.unwrap();

    assert!(outcome.ok);
}

#[tokio::test(start_paused = true)]
async fn test_search_rooms_ok_when_results_arrive() {
    let results = json!([{ "Name": "Lobby", "MemberCount": 3 }]);
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        search_reply: Some(results.clone()),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord
        .search_rooms(json!({ "Query": "lob" }), Duration::from_secs(5))
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.reply, Some(results));
}

#[tokio::test(start_paused = true)]
async fn test_account_query_ok_on_any_reply() {
    let (coord, _) = coordinator(MockBehavior {
        start_connected: true,
        start_logged_in: true,
        account_reply: Some(json!({ "OnlineFriends": [] })),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord
        .account_query("OnlineFriends", Duration::from_secs(5))
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.reply, Some(json!({ "OnlineFriends": [] })));
}

#[tokio::test(start_paused = true)]
async fn test_leave_room_requires_only_live_session() {
    // Not logged in, login would never complete — leave must not care.
    let (coord, built) = coordinator(MockBehavior {
        login_completes: false,
        room: Some(RoomRecord::named("Lobby")),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord.leave_room(Duration::from_secs(5)).await.unwrap();

    assert!(outcome.ok);
    let state = last_state(&built);
    assert_eq!(state.login_calls.load(Ordering::SeqCst), 0);
    assert!(state.room.lock().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_leave_room_times_out_when_room_never_clears() {
    let (coord, _) = coordinator(MockBehavior {
        room: Some(RoomRecord::named("Sticky")),
        leave_clears_room: false,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let outcome = coord.leave_room(Duration::from_secs(2)).await.unwrap();

    assert!(!outcome.ok);
}

// =========================================================================
// Buffers and read-only accessors
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_chat_history_is_pumped_stamped_and_clamped() {
    let (coord, built) = coordinator(MockBehavior::default());
    coord.start(params()).await;
    let state = last_state(&built);

    for i in 0..5 {
        state.send(ClientEvent::ChatMessage(json!({ "Content": i })));
    }
    settle_until(|| coord.chat_history(500).map(|h| h.len() == 5).unwrap_or(false)).await;

    // Zero clamps to one: only the newest record.
    let newest = coord.chat_history(0).unwrap();
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].message, json!({ "Content": 4 }));
    assert!(newest[0].received_at_ms > 0);

    let all = coord.chat_history(10_000).unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].message, json!({ "Content": 0 }));
}

#[tokio::test(start_paused = true)]
async fn test_recent_events_retains_last_hundred_in_order() {
    let (coord, built) = coordinator(MockBehavior::default());
    coord.start(params()).await;
    let state = last_state(&built);

    for i in 0..150 {
        state.send(ClientEvent::Protocol(json!({ "seq": i })));
    }
    settle_until(|| {
        coord
            .recent_events(100)
            .map(|e| e.first() == Some(&json!({ "seq": 50 })))
            .unwrap_or(false)
    })
    .await;

    let events = coord.recent_events(10_000).unwrap();
    assert_eq!(events.len(), 100);
    assert_eq!(events.first(), Some(&json!({ "seq": 50 })));
    assert_eq!(events.last(), Some(&json!({ "seq": 149 })));
}

#[tokio::test(start_paused = true)]
async fn test_read_accessors_fail_when_not_running() {
    let (coord, _) = coordinator(MockBehavior::default());

    assert!(matches!(
        coord.chat_history(10).unwrap_err(),
        CoordinatorError::NotRunning
    ));
    assert!(matches!(
        coord.recent_events(10).unwrap_err(),
        CoordinatorError::NotRunning
    ));
    assert!(matches!(
        coord.current_room().unwrap_err(),
        CoordinatorError::NotRunning
    ));
}

#[tokio::test(start_paused = true)]
async fn test_character_data_zero_member_is_invalid_input() {
    let (coord, _) = coordinator(MockBehavior::default());
    coord.start(params()).await;

    let err = coord.character_data(0).unwrap_err();
    assert!(matches!(err, CoordinatorError::InvalidMemberNumber));
    assert_eq!(err.to_string(), "invalid member number");
}

#[tokio::test(start_paused = true)]
async fn test_character_data_finds_player_and_roster() {
    let mut others = HashMap::new();
    others.insert(MemberId(10), CharacterRecord::new(MemberId(10), "ada"));

    let (coord, _) = coordinator(MockBehavior {
        player: CharacterRecord::new(MemberId(7), "Echo"),
        others,
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    assert_eq!(coord.character_data(7).unwrap().name, "Echo");
    assert_eq!(coord.character_data(10).unwrap().name, "ada");
    assert!(matches!(
        coord.character_data(99).unwrap_err(),
        CoordinatorError::MemberNotFound(MemberId(99))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_room_member_detail_never_answers_with_the_player() {
    let (coord, _) = coordinator(MockBehavior {
        player: CharacterRecord::new(MemberId(7), "Echo"),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    assert!(matches!(
        coord.room_member_detail(7).unwrap_err(),
        CoordinatorError::MemberNotFound(MemberId(7))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_current_room_reads_without_login() {
    let (coord, _) = coordinator(MockBehavior {
        login_completes: false,
        room: Some(RoomRecord::named("Lobby")),
        ..MockBehavior::default()
    });
    coord.start(params()).await;

    let room = coord.current_room().unwrap();
    assert_eq!(room.unwrap().name, "Lobby");
}
