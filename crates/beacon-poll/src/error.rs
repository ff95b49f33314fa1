//! Error type for a failed poll cycle.

use beacon_protocol::ParseError;
use beacon_rcon::RconError;

/// Any failure that aborts the current cycle's batch.
///
/// Both variants count the same toward the consecutive-error threshold;
/// neither ever escapes the poller task.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// A remote-console request failed or timed out.
    #[error(transparent)]
    Rcon(#[from] RconError),

    /// A response decoded to garbage.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
