//! Bounded, append-only ring stores for protocol events and chat messages.
//!
//! Both buffers are fed exclusively by the session's event pump and read by
//! any number of concurrent callers. Readers always get an owned copy of the
//! most recent entries, never a view of the live buffer, so an insert racing
//! a read can at worst make the copy stale by one entry — it can never tear
//! it.
//!
//! The locks here are `std::sync::Mutex`, not Tokio mutexes: they are held
//! only for a push or a copy, never across an await point.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

/// Retention limit for raw protocol events.
pub const EVENT_CAPACITY: usize = 100;

/// Retention limit for chat messages.
pub const CHAT_CAPACITY: usize = 500;

// ---------------------------------------------------------------------------
// BoundedLog
// ---------------------------------------------------------------------------

/// An append-only ring store that retains the most recent `capacity`
/// entries, evicting oldest-first on overflow.
#[derive(Debug)]
pub struct BoundedLog<T> {
    capacity: usize,
    entries: Mutex<VecDeque<T>>,
}

impl<T: Clone> BoundedLog<T> {
    /// Creates an empty log retaining at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero — a zero-capacity log could never
    /// satisfy the "limit clamps to at least one" read contract.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedLog capacity must be non-zero");
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Appends an entry, evicting the oldest when the log is full.
    pub fn push(&self, entry: T) {
        let mut entries = self.entries.lock().expect("buffer lock poisoned");
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns an owned copy of the most recent `limit` entries in arrival
    /// order (oldest of the selection first).
    ///
    /// `limit` is clamped to `[1, capacity]`.
    pub fn recent(&self, limit: usize) -> Vec<T> {
        let limit = limit.clamp(1, self.capacity);
        let entries = self.entries.lock().expect("buffer lock poisoned");
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("buffer lock poisoned").len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The retention limit.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ---------------------------------------------------------------------------
// ChatLog
// ---------------------------------------------------------------------------

/// A chat message plus the instant the session received it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRecord {
    /// Receipt time in milliseconds since the Unix epoch, stamped at
    /// insertion.
    pub received_at_ms: u64,

    /// The message payload, passed through structurally.
    pub message: Value,
}

/// The chat buffer: a [`BoundedLog`] that stamps each message with a receipt
/// timestamp on the way in.
#[derive(Debug)]
pub struct ChatLog {
    inner: BoundedLog<ChatRecord>,
}

impl ChatLog {
    /// Creates an empty chat log with the standard retention limit.
    pub fn new() -> Self {
        Self {
            inner: BoundedLog::new(CHAT_CAPACITY),
        }
    }

    /// Stamps and appends a message.
    pub fn push(&self, message: Value) {
        self.inner.push(ChatRecord {
            received_at_ms: unix_millis(),
            message,
        });
    }

    /// The most recent `limit` records in arrival order; `limit` clamped to
    /// `[1, 500]`.
    pub fn recent(&self, limit: usize) -> Vec<ChatRecord> {
        self.inner.recent(limit)
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =========================================================================
// Tests
// =========================================================================
