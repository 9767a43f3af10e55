//! Periodic tick that drives the task manager

use std::time::Duration;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

/// Produces "time elapsed" signals at a fixed resolution.
#[derive(Debug)]
pub struct TickSource {
    interval: Interval,
    last: Instant,
}

impl TickSource {
    pub fn new(resolution: Duration) -> Self {
        let mut interval = interval(resolution);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Wait for the next tick and return the time since the previous one.
    pub async fn tick(&mut self) -> Duration {
        let now = self.interval.tick().await;
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}
