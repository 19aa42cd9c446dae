//! # Sync Admission
//!
//! `total = applyGap` (or the configured default when unknown) and
//! `synced = syncProgress.synced` (or 0). A sample is admitted once
//! `total - synced < threshold`.

use shared_types::WalletState;

use crate::config::FundsGateConfig;

/// Indices still to process before the wallet counts as synced.
pub fn remaining_to_sync(state: &WalletState, config: &FundsGateConfig) -> u64 {
    let total = state.apply_gap().unwrap_or(config.default_gap);
    total.saturating_sub(state.synced())
}

/// Whether `state` is synchronized closely enough to look at its balance.
pub fn sync_admitted(state: &WalletState, config: &FundsGateConfig) -> bool {
    remaining_to_sync(state, config) < config.sync_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_of_200_not_admitted() {
        let state = WalletState::with_progress(800, 1000, 5);
        let config = FundsGateConfig::default();
        assert_eq!(remaining_to_sync(&state, &config), 200);
        assert!(!sync_admitted(&state, &config));
    }

    #[test]
    fn test_gap_of_1_admitted() {
        let state = WalletState::with_progress(999, 1000, 5);
        assert!(sync_admitted(&state, &FundsGateConfig::default()));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let state = WalletState::with_progress(900, 1000, 0);
        assert!(!sync_admitted(&state, &FundsGateConfig::default()));
    }

    #[test]
    fn test_missing_progress_uses_defaults() {
        let state = WalletState::default();
        assert_eq!(remaining_to_sync(&state, &FundsGateConfig::default()), 1000);
        assert!(!sync_admitted(&state, &FundsGateConfig::default()));
    }

    #[test]
    fn test_overshoot_saturates() {
        let state = WalletState::with_progress(1200, 1000, 0);
        assert_eq!(remaining_to_sync(&state, &FundsGateConfig::default()), 0);
    }
}
