//! Fixed-interval poll scheduler.

use std::time::Duration;

use tokio::time::{self, Instant};

/// Drives the poll loop at a fixed interval.
///
/// When a cycle overruns its interval, the next tick is scheduled from
/// now rather than from the missed deadline — the scheduler skips ahead
/// and never fires a burst of make-up ticks. Combined with the poller
/// running each cycle inline before waiting again, this keeps at most
/// one cycle's protocol traffic in flight.
pub struct PollScheduler {
    interval: Duration,
    next_tick: Instant,
    tick_count: u64,
}

impl PollScheduler {
    /// Creates a scheduler whose first tick fires one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: Instant::now() + interval,
            tick_count: 0,
        }
    }

    /// Waits until the next tick is due and returns its number.
    pub async fn wait_for_tick(&mut self) -> u64 {
        time::sleep_until(self.next_tick).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(self.next_tick);
        if late_by > self.interval / 10 {
            let skipped =
                late_by.as_nanos() as u64 / self.interval.as_nanos().max(1) as u64;
            tracing::warn!(
                tick = self.tick_count,
                skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "poll cycle overran the interval, skipping ahead"
            );
        }

        // Always schedule from now, not from the missed deadline.
        self.next_tick = now + self.interval;
        self.tick_count
    }

    /// Ticks elapsed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The configured poll interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
