//! Error types for the broadcast layer.

/// Errors that can occur while publishing a snapshot.
///
/// Per-subscriber delivery failures are not errors at this level — they
/// deregister the subscriber and delivery continues. Only failing to
/// encode the payload itself surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    /// The snapshot could not be serialized to JSON.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
