//! Error types for response parsing.

/// Errors produced while decoding a remote-console response.
///
/// A `ParseError` always means the response text did not have the shape
/// the game server normally produces. During a poll cycle it aborts the
/// current batch and counts as one protocol failure; it never crashes
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The `list` response has no leading player count.
    #[error("no player count in list response: {0:?}")]
    MissingCount(String),

    /// The response has no `:` separating the preamble from the data.
    #[error("missing ':' delimiter in response: {0:?}")]
    MissingDelimiter(String),

    /// A position response produced fewer than three numeric tokens.
    #[error("expected 3 coordinates, found {found}")]
    MissingCoordinates { found: usize },

    /// A coordinate token did not parse as a number.
    #[error("invalid coordinate {token:?}: {source}")]
    InvalidCoordinate {
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}
