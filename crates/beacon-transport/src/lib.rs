//! Subscriber transport abstraction for Beacon.
//!
//! Subscribers are listeners: the bridge pushes snapshot payloads to them
//! and only reads their side of the connection to notice when they leave.
//! The [`Transport`]/[`Connection`] traits capture exactly that surface,
//! so the broadcaster and connection handlers can be tested against mocks
//! while production runs on [`WebSocketTransport`].

#![allow(async_fn_in_trait)]

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Accepts inbound subscriber connections.
pub trait Transport: Send + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;

    /// Waits for and accepts the next subscriber.
    async fn accept(&mut self) -> Result<Self::Connection, TransportError>;

    /// The local address the transport is bound to.
    fn local_addr(&self) -> std::io::Result<std::net::SocketAddr>;
}

/// A single subscriber connection.
///
/// Sending and receiving are independently locked so a broadcast can
/// deliver while the connection's handler task is parked in
/// [`recv`](Self::recv) waiting for the subscriber to hang up.
pub trait Connection: Send + Sync + 'static {
    /// Delivers one text payload to the subscriber.
    async fn send_text(&self, payload: &str) -> Result<(), TransportError>;

    /// Receives the next inbound frame.
    ///
    /// Returns `Ok(None)` when the subscriber closed cleanly. The bridge
    /// ignores inbound content; this exists to observe the close.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), TransportError>;

    /// Unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
