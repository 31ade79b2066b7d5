//! Core record types shared across the Botlink workspace.
//!
//! The chat server's payloads are loosely-shaped JSON objects. The
//! coordinator only interprets a handful of fields (member numbers, display
//! names, room names); everything else is carried as-is so the façade can
//! hand complete records back to callers. `#[serde(flatten)]` captures the
//! uninterpreted remainder without naming every upstream field.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The numeric identifier the chat server assigns to each participant.
///
/// A newtype over `u64`: a `MemberId` can't be confused with a plain count
/// or a room identifier, and serde's `transparent` keeps the wire shape a
/// bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    /// Returns the raw numeric identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Reply markers
// ---------------------------------------------------------------------------

/// Literal sentinel values the chat server broadcasts to signal the outcome
/// of room operations.
///
/// The server has no per-request correlation token: it answers a room-create
/// or room-join request by broadcasting one of these strings. An operation
/// succeeded exactly when the observed reply equals the expected marker.
pub mod marker {
    /// Terminal reply for a successful room creation.
    pub const ROOM_CREATED: &str = "ChatRoomCreated";

    /// Terminal reply for a successful room join.
    pub const ROOM_JOINED: &str = "JoinedRoom";
}

// ---------------------------------------------------------------------------
// CharacterRecord
// ---------------------------------------------------------------------------

/// A participant record as synced by the protocol client.
///
/// Covers both the bot's own player record and every roster entry. Only
/// `member_number` and `name` are interpreted; the rest of the upstream
/// object (appearance, reputation, whatever the server adds next) rides in
/// `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// The server-assigned member identifier. Absent until the server has
    /// acknowledged the login.
    #[serde(rename = "MemberNumber", skip_serializing_if = "Option::is_none")]
    pub member_number: Option<MemberId>,

    /// Display name. Empty string when the server hasn't provided one.
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Every upstream field the coordinator doesn't interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CharacterRecord {
    /// Creates a record with just the interpreted fields set.
    pub fn new(member_number: impl Into<Option<MemberId>>, name: impl Into<String>) -> Self {
        Self {
            member_number: member_number.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomRecord
// ---------------------------------------------------------------------------

/// The current-room record as synced by the protocol client.
///
/// Room settings are a structural pass-through: the coordinator never
/// validates them, it only reads the name for status reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// The room's name.
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Uninterpreted room settings (limits, background, admin lists, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoomRecord {
    /// Creates a room record with the given name and no extra settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
