use std::time::{Duration, Instant};

/// Simulated time advanced per expansion/rollout step.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Wall-clock planning deadline.
///
/// Cancellation is polling-based: loops check `expired()` and drop in-progress work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    pub fn after_ms(budget_ms: u64) -> Self {
        Self::after(Duration::from_millis(budget_ms))
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}
