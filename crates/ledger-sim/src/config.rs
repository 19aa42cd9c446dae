//! # Simulator Configuration

use std::time::Duration;

/// Standalone ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerSimConfig {
    /// Latency of every submission (proving plus inclusion).
    pub block_time: Duration,
    /// Seed for contract addresses; `None` draws them from the OS.
    pub address_seed: Option<u64>,
    /// Native balance minted to the simulated wallet at genesis.
    pub genesis_balance: u128,
}

impl Default for LedgerSimConfig {
    fn default() -> Self {
        Self {
            block_time: Duration::from_millis(500),
            address_seed: None,
            genesis_balance: 1_000_000_000,
        }
    }
}

impl LedgerSimConfig {
    /// Instant blocks and deterministic addresses.
    pub fn for_testing() -> Self {
        Self {
            block_time: Duration::ZERO,
            address_seed: Some(7),
            ..Self::default()
        }
    }
}
