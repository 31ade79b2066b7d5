//! The login gate: connected-and-authenticated as a precondition.
//!
//! Every room-affecting command routes through [`ensure_logged_in`] before
//! touching the server. The gate is idempotent — an already-authenticated
//! session returns immediately with no side effect — and safe under
//! concurrent callers: the login exchange is initiated at most once while an
//! attempt is outstanding, with later callers just polling the flag.

use std::sync::atomic::Ordering;
use std::time::Duration;

use botlink_client::ProtocolClient;

use crate::CoordinatorError;
use crate::session::Session;
use crate::wait::wait_until;

/// Ensures the session is connected and authenticated, or fails with a
/// login error.
///
/// Flow: fast path when already logged in; otherwise connect if needed,
/// give the connection a moment to settle, initiate login once, then poll
/// the login flag every `poll_interval` until it flips or `timeout` elapses.
///
/// The "no session running" precondition is checked by the coordinator
/// before it hands a session here.
pub(crate) async fn ensure_logged_in<C: ProtocolClient>(
    session: &Session<C>,
    timeout: Duration,
    poll_interval: Duration,
    connect_settle: Duration,
) -> Result<(), CoordinatorError> {
    if session.client.is_logged_in() {
        return Ok(());
    }

    if !session.client.is_connected() {
        tracing::debug!("login gate: connecting");
        session
            .client
            .connect()
            .await
            .map_err(|e| CoordinatorError::LoginFailed(e.to_string()))?;
        // Let the handshake and initial state sync land before logging in.
        tokio::time::sleep(connect_settle).await;
    }

    // First caller through initiates the exchange; everyone else polls.
    if !session.login_started.swap(true, Ordering::AcqRel) {
        tracing::debug!("login gate: initiating login");
        if let Err(e) = session.client.login().await {
            // The attempt never went out; a later caller may retry.
            session.login_started.store(false, Ordering::Release);
            return Err(CoordinatorError::LoginFailed(e.to_string()));
        }
    }

    if wait_until(|| session.client.is_logged_in(), poll_interval, timeout).await {
        tracing::info!("login gate: session authenticated");
        Ok(())
    } else {
        // The attempt is no longer outstanding; the next caller may
        // re-initiate.
        session.login_started.store(false, Ordering::Release);
        tracing::warn!(timeout_ms = timeout.as_millis() as u64, "login gate: timed out");
        Err(CoordinatorError::LoginTimeout)
    }
}
