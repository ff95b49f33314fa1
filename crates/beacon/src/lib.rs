//! # Beacon
//!
//! Bridges a game server's remote-console interface to live WebSocket
//! subscribers: a single poller task periodically collects every online
//! player's position and dimension, assembles a snapshot, and fans it
//! out to whoever is connected. Newcomers get the last snapshot the
//! moment they join.
//!
//! The layers, bottom up: `beacon-protocol` (parsing + snapshot types),
//! `beacon-rcon` (remote-console session), `beacon-transport`
//! (subscriber WebSocket), `beacon-broadcast` (registry + fan-out),
//! `beacon-poll` (cycle state machine). This crate wires them together
//! behind [`Bridge`] and owns the binary entry point.
//!
//! The bridge is designed to run unattended: no failure is fatal, the
//! remote-console session self-heals with an armed retry, and subscriber
//! outages only cost the affected subscriber its registration.

mod config;
mod error;
mod handler;
mod server;

pub use config::Config;
pub use error::BridgeError;
pub use handler::serve_subscriber;
pub use server::{Bridge, accept_loop};
