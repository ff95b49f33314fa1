//! Unified error type for the bridge.

use beacon_broadcast::BroadcastError;
use beacon_protocol::ParseError;
use beacon_rcon::RconError;
use beacon_transport::TransportError;

/// Top-level error wrapping the per-layer errors.
///
/// Embedders of the bridge deal with this single type; the `#[from]`
/// impls let `?` convert layer errors automatically. Nothing in the
/// bridge treats any of these as fatal — they end a connection or a
/// cycle, never the process.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A subscriber-transport error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A remote-console error (connect, auth, send, timeout).
    #[error(transparent)]
    Rcon(#[from] RconError),

    /// A snapshot fan-out error (payload encoding).
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    /// A malformed remote-console response.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
