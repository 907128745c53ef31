use std::time::{Duration, Instant};

/// Implemented by domain models driven by the step loop.
///
/// The runtime owns the cadence; the model only sees the actual elapsed
/// time since the last accepted tick (not the nominal interval), so it can
/// compensate for host jitter.
pub trait Simulation {
    fn step(&mut self, elapsed_seconds: f64);
}

/// Cadence gate for a host-driven frame loop.
///
/// The host polls once per frame; `poll` accepts a tick only when at least
/// the configured interval has elapsed since the last accepted tick.
/// Skipped frames are dropped, never queued: a slow host produces fewer
/// simulation steps, not a backlog.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    step_time: Duration,
    last: Instant,
}

impl Ticker {
    pub fn start(step_time: Duration, now: Instant) -> Self {
        Self { step_time, last: now }
    }

    pub fn step_time(&self) -> Duration {
        self.step_time
    }

    /// Returns the actual elapsed time when a tick is due, `None` when the
    /// frame should be skipped.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last);
        if elapsed < self.step_time {
            return None;
        }
        self.last = now;
        Some(elapsed)
    }
}
