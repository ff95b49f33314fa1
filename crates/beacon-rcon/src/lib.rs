//! Remote-console client and session management for Beacon.
//!
//! This crate owns the bridge's single point of contact with the game
//! server's administrative interface:
//!
//! - [`RconEndpoint`] — the trait seam over connect/send/disconnect,
//!   mocked in tests.
//! - [`RconClient`] — the real endpoint: Source RCON packet framing over
//!   a Tokio TCP stream, with every operation bounded by the configured
//!   timeout.
//! - [`RconSession`] — the state machine above the endpoint: tracks
//!   authentication, consecutive failures, and the armed reconnect retry.
//!
//! Requests are issued one at a time by construction — the session takes
//! `&mut self` and is owned by a single task (the poller).

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod packet;
mod session;

pub use client::RconClient;
pub use error::RconError;
pub use session::RconSession;

/// Operations a remote-console endpoint must provide.
///
/// The `&mut self` receivers enforce the at-most-one-in-flight-request
/// discipline: a caller cannot overlap two sends on the same endpoint.
pub trait RconEndpoint: Send + 'static {
    /// Establishes the connection and authenticates.
    async fn connect(&mut self) -> Result<(), RconError>;

    /// Sends one command and returns the response text.
    async fn send(&mut self, command: &str) -> Result<String, RconError>;

    /// Tears down the connection. Safe to call when not connected.
    async fn disconnect(&mut self) -> Result<(), RconError>;
}
