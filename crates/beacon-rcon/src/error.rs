//! Error types for the remote-console layer.

use std::time::Duration;

/// Errors that can occur talking to the remote-console endpoint.
///
/// Two families: connection establishment ([`ConnectFailed`](Self::ConnectFailed),
/// [`AuthRejected`](Self::AuthRejected)) is resolved by the armed retry and
/// never surfaces past the session; everything else is a send-path failure
/// the poller counts toward the consecutive-error threshold.
#[derive(Debug, thiserror::Error)]
pub enum RconError {
    /// TCP connect or handshake I/O failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The server rejected the credential.
    #[error("authentication rejected by server")]
    AuthRejected,

    /// A command was sent while the session is not authenticated.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Writing or reading a command round-trip failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The operation exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The peer closed the connection.
    #[error("connection lost")]
    ConnectionLost,

    /// The peer sent bytes that don't frame as a valid packet.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}
