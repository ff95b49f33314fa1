//! Session state machine over a remote-console endpoint.

use std::time::Duration;

use tokio::time::Instant;

use crate::{RconEndpoint, RconError};

/// The bridge's single point of contact with the remote console.
///
/// Owns the endpoint and the session state the rest of the system reads:
/// whether the session is authenticated (the one source of truth for "is
/// this usable"), how many consecutive poll failures have occurred, and
/// whether a reconnect retry is armed. All state transitions happen
/// through methods here; the poller drives them but never touches the
/// fields.
pub struct RconSession<E: RconEndpoint> {
    endpoint: E,
    retry_delay: Duration,
    authenticated: bool,
    consecutive_errors: u32,
    /// Deadline of the armed reconnect retry, if any. Armed on connect
    /// failure and polled by the owning task; no timer task is spawned.
    pending_retry: Option<Instant>,
}

impl<E: RconEndpoint> RconSession<E> {
    /// Wraps an endpoint without connecting. The first connection attempt
    /// happens on [`connect`](Self::connect), never in the constructor.
    pub fn new(endpoint: E, retry_delay: Duration) -> Self {
        tracing::info!("initializing remote console session");
        Self {
            endpoint,
            retry_delay,
            authenticated: false,
            consecutive_errors: 0,
            pending_retry: None,
        }
    }

    /// `true` once the endpoint has connected and authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Consecutive failed poll cycles since the last success.
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// `true` while a reconnect retry is armed (fired or not).
    pub fn retry_armed(&self) -> bool {
        self.pending_retry.is_some()
    }

    /// `true` when an armed retry's deadline has passed.
    pub fn retry_due(&self) -> bool {
        self.pending_retry
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Arms the reconnect retry one delay from now.
    pub fn arm_retry(&mut self) {
        tracing::debug!(delay = ?self.retry_delay, "arming reconnect retry");
        self.pending_retry = Some(Instant::now() + self.retry_delay);
    }

    /// Attempts to connect and authenticate. No-op when already
    /// authenticated.
    ///
    /// Success clears the consecutive-error count and disarms the retry.
    /// Failure is logged and leaves a fresh retry armed — connection
    /// errors never propagate past this method.
    pub async fn connect(&mut self) {
        if self.authenticated {
            return;
        }

        tracing::info!("attempting to establish remote console connection");
        match self.endpoint.connect().await {
            Ok(()) => {
                self.authenticated = true;
                self.consecutive_errors = 0;
                self.pending_retry = None;
                tracing::info!("remote console connection established");
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote console connection failed");
                self.pending_retry = Some(Instant::now() + self.retry_delay);
            }
        }
    }

    /// Sends one command. Fails fast when not authenticated; otherwise
    /// forwards to the endpoint. The caller counts failures via
    /// [`record_failure`](Self::record_failure).
    pub async fn send(&mut self, command: &str) -> Result<String, RconError> {
        if !self.authenticated {
            return Err(RconError::NotAuthenticated);
        }
        self.endpoint.send(command).await
    }

    /// Tears the connection down and reconnects through the same path as
    /// [`connect`](Self::connect). Invoked after repeated failures; a
    /// disconnect error is logged, not fatal.
    pub async fn reset(&mut self) {
        tracing::info!("too many remote console errors, re-establishing connection");
        if let Err(e) = self.endpoint.disconnect().await {
            tracing::warn!(error = %e, "error disconnecting remote console");
        }
        self.authenticated = false;
        self.connect().await;
    }

    /// Records one failed cycle and returns the new count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_errors += 1;
        self.consecutive_errors
    }

    /// Clears the consecutive-error count after a successful cycle.
    pub fn clear_errors(&mut self) {
        self.consecutive_errors = 0;
    }
}
