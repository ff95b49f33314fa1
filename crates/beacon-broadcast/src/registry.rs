//! Subscriber connection bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;

use beacon_transport::{Connection, ConnectionId};

/// The set of live subscriber connections.
///
/// Pure bookkeeping: add on accept, remove on close or send failure,
/// iterate for fan-out. No business logic lives here; only the
/// [`Broadcaster`](crate::Broadcaster) touches it.
pub struct SubscriberRegistry<C> {
    subscribers: HashMap<ConnectionId, Arc<C>>,
}

impl<C: Connection> SubscriberRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Registers a connection under its own id.
    pub fn add(&mut self, conn: Arc<C>) {
        self.subscribers.insert(conn.id(), conn);
    }

    /// Deregisters a connection. Returns `false` if it was already gone;
    /// removing twice is harmless.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// `true` if the connection is currently registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Iterates over the registered connections.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Arc<C>)> {
        self.subscribers.iter().map(|(id, conn)| (*id, conn))
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// `true` when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<C: Connection> Default for SubscriberRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
