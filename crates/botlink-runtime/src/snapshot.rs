//! Point-in-time status snapshots.
//!
//! A snapshot is composed in a single pass over the session's fields and
//! returned by value: the background session may keep mutating while a
//! caller holds the result, making it stale by an update or two, but never
//! torn — every field was read from the same sweep.

use botlink_client::ProtocolClient;
use botlink_protocol::MemberId;
use serde::Serialize;

use crate::session::Session;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// A participant summary as reported in status results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    /// Server-assigned identifier; absent when the server hasn't provided
    /// one yet.
    pub member_number: Option<MemberId>,
    /// Display name.
    pub name: String,
}

/// Immutable projection of the session's state.
///
/// Every field except `running` is absent when no session exists, so the
/// no-session result serializes to exactly `{"running": false}` — remote
/// callers rely on that literal shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Whether a session handle is live (driving task not yet finished).
    pub running: bool,

    /// Whether the server connection is established.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,

    /// Whether the server has acknowledged authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_in: Option<bool>,

    /// The bot's own identity summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<MemberSummary>,

    /// Name of the current room; absent when not in a room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatroom: Option<String>,

    /// Number of other participants the session knows about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,

    /// Roster sorted ascending by member number, absent identifiers first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberSummary>>,

    /// Number of protocol events currently retained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_event_count: Option<usize>,
}

impl StatusSnapshot {
    /// The snapshot returned when no session exists: `{"running": false}`
    /// and nothing else.
    pub fn not_running() -> Self {
        Self {
            running: false,
            connected: None,
            logged_in: None,
            player: None,
            chatroom: None,
            member_count: None,
            members: None,
            recent_event_count: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Reads every session field in one sweep and composes the full snapshot
/// before returning it.
pub(crate) fn build<C: ProtocolClient>(session: &Session<C>, running: bool) -> StatusSnapshot {
    let player = session.client.player();
    let others = session.client.others();
    let room = session.client.current_room();

    let mut members: Vec<MemberSummary> = others
        .into_values()
        .map(|record| MemberSummary {
            member_number: record.member_number,
            name: record.name,
        })
        .collect();
    // Ascending by member number; an absent number sorts first.
    members.sort_by_key(|m| m.member_number.map_or(0, MemberId::get));

    StatusSnapshot {
        running,
        connected: Some(session.client.is_connected()),
        logged_in: Some(session.client.is_logged_in()),
        player: Some(MemberSummary {
            member_number: player.member_number,
            name: player.name,
        }),
        chatroom: room.map(|r| r.name),
        member_count: Some(members.len()),
        members: Some(members),
        recent_event_count: Some(session.shared.events.len()),
    }
}

// =========================================================================
// Tests
// =========================================================================
