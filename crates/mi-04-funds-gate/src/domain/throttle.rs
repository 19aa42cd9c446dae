//! # Leading-edge Throttle
//!
//! The first sample is admitted; later samples are discarded until the
//! interval since the last admitted one has elapsed.

use std::time::Duration;

use tokio::time::Instant;

/// Leading-edge sample throttle.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl Throttle {
    /// Create a throttle admitting at most one sample per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Decide on a sample observed at `now`.
    pub fn admit(&mut self, now: Instant) -> bool {
        let open = match self.last_admitted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if open {
            self.last_admitted = Some(now);
        }
        open
    }
}
