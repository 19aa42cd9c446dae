//! # Reader Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public state reader configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Interval between ledger queries of one subscription.
    pub poll_interval: Duration,

    /// Snapshots buffered per subscription before the poller waits.
    pub channel_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            channel_capacity: 16,
        }
    }
}

impl ReaderConfig {
    /// Create a config for testing (fast polling).
    pub fn for_testing() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            channel_capacity: 4,
        }
    }
}
