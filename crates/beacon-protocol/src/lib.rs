//! Wire types and response parsing for Beacon.
//!
//! This crate is the pure core of the bridge:
//!
//! - **Types** ([`PlayerRecord`], [`Snapshot`]) — the shape broadcast to
//!   subscribers, serialized as a JSON object keyed by player name.
//! - **Parsers** ([`parse_player_list`], [`parse_coordinates`],
//!   [`parse_dimension`]) — turn raw remote-console response text into
//!   typed values.
//! - **Errors** ([`ParseError`]) — what can go wrong while decoding a
//!   response.
//!
//! Everything here is deterministic and side-effect-free. The real game
//! server has no simulator, so the poll pipeline is tested entirely
//! through these functions plus mocked transports in the other crates.

mod error;
mod parse;
mod types;

pub use error::ParseError;
pub use parse::{parse_coordinates, parse_dimension, parse_player_list};
pub use types::{PlayerRecord, Snapshot};
