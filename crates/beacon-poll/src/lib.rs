//! Polling layer for Beacon.
//!
//! A single task owns the remote-console session and drives one poll
//! cycle per interval:
//!
//! - [`PollScheduler`] — fixed-interval ticks that skip ahead after an
//!   overrun instead of bursting to catch up.
//! - [`Poller`] — the per-cycle state machine: reconnect-retry arming,
//!   cycle preconditions, the `list` → per-player position/dimension
//!   request sequence, snapshot assembly, and the consecutive-error
//!   threshold that forces a session reset.

mod error;
mod poller;
mod scheduler;

pub use error::CycleError;
pub use poller::{ERROR_THRESHOLD, Poller};
pub use scheduler::PollScheduler;
