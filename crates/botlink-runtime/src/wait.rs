//! Timeout-bounded predicate polling.
//!
//! The chat server answers requests by broadcast, with no per-request
//! correlation visible at this layer. The only safe way to await an outcome
//! is to watch the shared slot the event pump writes into — so every command
//! that expects an asynchronous reply reduces to one primitive: poll a
//! predicate with a cooperative sleep between attempts until it holds or the
//! timeout elapses.

use std::time::Duration;

use tokio::time::{self, Instant};

/// Polls `predicate` every `poll_interval` until it returns `true` or
/// `timeout` elapses. Returns whether the predicate held.
///
/// The predicate is evaluated once immediately, so an already-satisfied
/// condition never sleeps. The final sleep is shortened to the remaining
/// time, so the call never overshoots the deadline by a full interval.
pub async fn wait_until<F>(mut predicate: F, poll_interval: Duration, timeout: Duration) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        time::sleep(poll_interval.min(deadline - now)).await;
    }
}

// =========================================================================
// Tests
// =========================================================================
