//! Snapshot types broadcast to subscribers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One player's position record inside a snapshot.
///
/// Coordinates are the raw values reported by the game server; the
/// dimension is an opaque label (e.g. `"minecraft:overworld"`) passed
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub dimension: String,
}

/// One complete, consistent set of player records from a single poll cycle.
///
/// Serializes as a JSON object mapping player name to record, which is the
/// exact payload subscribers receive:
///
/// ```json
/// {"Alice":{"name":"Alice","x":1.0,"y":2.0,"z":3.0,"dimension":"the_end"}}
/// ```
///
/// Invariant: every key equals its record's `name` field. The only
/// insertion path ([`insert`](Self::insert)) keys by the record's own
/// name, so the invariant cannot be broken from outside. A `BTreeMap`
/// keeps the serialized form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, PlayerRecord>);

impl Snapshot {
    /// Creates an empty snapshot — the value replayed to subscribers who
    /// join before the first poll completes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a record, keyed by the record's own name.
    pub fn insert(&mut self, record: PlayerRecord) {
        self.0.insert(record.name.clone(), record);
    }

    /// Looks up a player's record by name.
    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.0.get(name)
    }

    /// Number of players in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no players are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the records in name order.
    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.0.values()
    }
}
