//! Snapshot fan-out for Beacon.
//!
//! - [`SubscriberRegistry`] — pure bookkeeping of live connection handles.
//! - [`Broadcaster`] — owns the registry and the last published snapshot;
//!   fans new snapshots out to every subscriber and replays the last one
//!   to newcomers so they never wait a full poll interval for data.
//!
//! The broadcaster is not internally synchronized. The server wraps it in
//! a `tokio::sync::Mutex` so subscriber joins/leaves may interleave with
//! a publish without corruption.

mod broadcaster;
mod error;
mod registry;

pub use broadcaster::Broadcaster;
pub use error::BroadcastError;
pub use registry::SubscriberRegistry;
