//! # Wallet State
//!
//! The shape of the wallet-state stream observed by the funds readiness gate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier of a token type held by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub String);

impl TokenId {
    /// The native token that pays transaction fees.
    pub fn native() -> Self {
        Self(NATIVE_TOKEN.to_string())
    }
}

/// Identifier of the native fee token.
pub const NATIVE_TOKEN: &str = "0200000000000000000000000000000000000000000000000000000000000000000000";

/// Lag of the wallet behind the chain tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLag {
    /// Number of indices not yet applied.
    pub apply_gap: u64,
}

/// Synchronization progress reported by a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Indices processed so far.
    pub synced: Option<u64>,
    /// Lag behind the tip, when known.
    pub lag: Option<SyncLag>,
}

/// One sample of the wallet-state stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    /// Balance per token.
    pub balances: HashMap<TokenId, u128>,
    /// Sync progress, absent before the wallet starts syncing.
    pub sync_progress: Option<SyncProgress>,
}

impl WalletState {
    /// Indices processed, `0` when unknown.
    pub fn synced(&self) -> u64 {
        self.sync_progress
            .and_then(|p| p.synced)
            .unwrap_or(0)
    }

    /// Apply gap, `None` when unknown.
    pub fn apply_gap(&self) -> Option<u64> {
        self.sync_progress
            .and_then(|p| p.lag)
            .map(|lag| lag.apply_gap)
    }

    /// Balance of the native token, `0` when absent.
    pub fn native_balance(&self) -> u128 {
        self.balances
            .get(&TokenId::native())
            .copied()
            .unwrap_or(0)
    }

    /// Build a sample with the given sync figures and native balance.
    pub fn with_progress(synced: u64, apply_gap: u64, native_balance: u128) -> Self {
        let mut balances = HashMap::new();
        balances.insert(TokenId::native(), native_balance);
        Self {
            balances,
            sync_progress: Some(SyncProgress {
                synced: Some(synced),
                lag: Some(SyncLag { apply_gap }),
            }),
        }
    }
}
