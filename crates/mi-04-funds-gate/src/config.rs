//! # Funds Gate Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Funds readiness gate configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsGateConfig {
    /// Minimum interval between admitted wallet samples.
    pub sample_interval: Duration,

    /// A wallet is synced enough once `total - synced` drops below this.
    pub sync_threshold: u64,

    /// `total` assumed while the wallet does not report an apply gap.
    pub default_gap: u64,
}

impl Default for FundsGateConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(10),
            sync_threshold: 100,
            default_gap: 1000,
        }
    }
}

impl FundsGateConfig {
    /// Create a config for testing (short sampling interval).
    pub fn for_testing() -> Self {
        Self {
            sample_interval: Duration::from_millis(10),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FundsGateConfig::default();
        assert_eq!(config.sample_interval, Duration::from_secs(10));
        assert_eq!(config.sync_threshold, 100);
        assert_eq!(config.default_gap, 1000);
    }
}
