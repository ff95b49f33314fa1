//! Snapshot storage and fan-out.

use std::sync::Arc;

use beacon_protocol::Snapshot;
use beacon_transport::{Connection, ConnectionId};

use crate::{BroadcastError, SubscriberRegistry};

/// Owns the subscriber registry and the last-known snapshot.
///
/// The snapshot starts empty, so a subscriber who joins before the first
/// poll completes still receives a well-formed payload immediately. Each
/// publish replaces the stored snapshot atomically — the broadcaster
/// never observes a half-built one because snapshots arrive by value.
pub struct Broadcaster<C> {
    registry: SubscriberRegistry<C>,
    last: Snapshot,
}

impl<C: Connection> Broadcaster<C> {
    /// Creates a broadcaster with no subscribers and the empty snapshot.
    pub fn new() -> Self {
        Self {
            registry: SubscriberRegistry::new(),
            last: Snapshot::empty(),
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// The most recently published snapshot.
    pub fn last_snapshot(&self) -> &Snapshot {
        &self.last
    }

    /// Stores `snapshot` as last-known and sends it to every subscriber.
    ///
    /// A subscriber whose send fails is logged, deregistered immediately,
    /// and delivery to the rest continues. Returns the number of
    /// subscribers that received the payload.
    pub async fn publish(&mut self, snapshot: Snapshot) -> Result<usize, BroadcastError> {
        let payload =
            serde_json::to_string(&snapshot).map_err(BroadcastError::Encode)?;
        self.last = snapshot;

        tracing::debug!(
            subscribers = self.registry.len(),
            players = self.last.len(),
            "publishing snapshot"
        );

        let mut dead = Vec::new();
        for (id, conn) in self.registry.iter() {
            if let Err(e) = conn.send_text(&payload).await {
                tracing::warn!(%id, error = %e, "dropping unreachable subscriber");
                dead.push(id);
            }
        }

        let delivered = self.registry.len() - dead.len();
        for id in dead {
            self.registry.remove(id);
        }
        Ok(delivered)
    }

    /// Registers a new subscriber and immediately replays the last
    /// snapshot to it. A replay failure deregisters it on the spot.
    pub async fn on_join(&mut self, conn: Arc<C>) {
        let id = conn.id();
        self.registry.add(Arc::clone(&conn));
        tracing::info!(%id, subscribers = self.registry.len(), "subscriber joined");

        let payload = match serde_json::to_string(&self.last) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode replay snapshot");
                return;
            }
        };
        if let Err(e) = conn.send_text(&payload).await {
            tracing::warn!(%id, error = %e, "replay failed, dropping subscriber");
            self.registry.remove(id);
        }
    }

    /// Deregisters a subscriber. Idempotent.
    pub fn on_leave(&mut self, id: ConnectionId) {
        if self.registry.remove(id) {
            tracing::info!(%id, subscribers = self.registry.len(), "subscriber left");
        }
    }
}

impl<C: Connection> Default for Broadcaster<C> {
    fn default() -> Self {
        Self::new()
    }
}
