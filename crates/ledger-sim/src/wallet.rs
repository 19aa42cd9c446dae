//! # Simulated Wallet
//!
//! A wallet whose sync progress and balance are set by hand. Samples are
//! held in a `watch` cell, so subscribers see the latest one first and may
//! miss intermediate ones, as with a real wallet's state feed.

use futures::StreamExt;
use mi_04_funds_gate::{WalletStateSource, WalletStateStream};
use shared_types::{SyncLag, SyncProgress, TokenId, WalletState};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

/// Hand-driven wallet state feed.
pub struct SimulatedWallet {
    state: watch::Sender<WalletState>,
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedWallet {
    /// Wallet with no sync progress and no funds.
    pub fn new() -> Self {
        let (state, _) = watch::channel(WalletState::default());
        Self { state }
    }

    /// Fully synced wallet holding `balance` native tokens.
    pub fn genesis(balance: u128) -> Self {
        let wallet = Self::new();
        wallet.set_sync(0, 0);
        wallet.fund(balance);
        wallet
    }

    /// Report `synced` applied indices against a gap of `apply_gap`.
    pub fn set_sync(&self, synced: u64, apply_gap: u64) {
        self.state.send_modify(|state| {
            state.sync_progress = Some(SyncProgress {
                synced: Some(synced),
                lag: Some(SyncLag { apply_gap }),
            });
        });
        debug!(synced, apply_gap, "Simulated wallet sync progress");
    }

    /// Credit `amount` native tokens.
    pub fn fund(&self, amount: u128) {
        self.state.send_modify(|state| {
            let balance = state.balances.entry(TokenId::native()).or_insert(0);
            *balance = balance.saturating_add(amount);
        });
        debug!(amount = %amount, "Simulated wallet funded");
    }

    /// Latest sample.
    pub fn state(&self) -> WalletState {
        self.state.borrow().clone()
    }
}

impl WalletStateSource for SimulatedWallet {
    fn current(&self) -> Option<WalletState> {
        Some(self.state())
    }

    fn subscribe(&self) -> WalletStateStream {
        WatchStream::new(self.state.subscribe()).boxed()
    }
}
