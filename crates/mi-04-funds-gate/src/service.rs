//! # Funds Readiness Gate Service

use shared_types::{IndexError, WalletState};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::config::FundsGateConfig;
use crate::domain::{remaining_to_sync, Throttle};
use crate::ports::{WalletStateSource, WalletStateStream};

/// Blocks until a wallet is synchronized and holds native funds.
#[derive(Debug, Clone, Default)]
pub struct FundsReadinessGate {
    config: FundsGateConfig,
}

impl FundsReadinessGate {
    /// Create a gate.
    pub fn new(config: FundsGateConfig) -> Self {
        Self { config }
    }

    /// Gate configuration.
    pub fn config(&self) -> &FundsGateConfig {
        &self.config
    }

    /// Return the native balance of `source`, waiting for funds if needed.
    ///
    /// A current sample that is already funded is returned without waiting.
    pub async fn ensure_funded(
        &self,
        source: &dyn WalletStateSource,
        shutdown: watch::Receiver<bool>,
    ) -> Result<u128, IndexError> {
        // Subscribe first so nothing emitted after the check is missed.
        let samples = source.subscribe();

        if let Some(balance) = source
            .current()
            .as_ref()
            .map(WalletState::native_balance)
            .filter(|b| *b > 0)
        {
            info!(balance = %balance, "Wallet already funded");
            return Ok(balance);
        }

        self.wait_for_funds(samples, shutdown).await
    }

    /// Consume `samples` until the first admitted, synced sample with a
    /// positive native balance.
    ///
    /// Fails with `Cancelled` when `shutdown` flips to `true` and with
    /// `Unavailable` when the stream ends.
    pub async fn wait_for_funds(
        &self,
        mut samples: WalletStateStream,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<u128, IndexError> {
        if *shutdown.borrow() {
            return Err(IndexError::Cancelled);
        }

        let mut throttle = Throttle::new(self.config.sample_interval);
        let mut shutdown_live = true;

        loop {
            let sample = tokio::select! {
                changed = shutdown.changed(), if shutdown_live => {
                    match changed {
                        Ok(()) if *shutdown.borrow() => {
                            info!("Funds wait cancelled");
                            return Err(IndexError::Cancelled);
                        }
                        Ok(()) => continue,
                        // Sender gone: nobody can cancel any more.
                        Err(_) => {
                            shutdown_live = false;
                            continue;
                        }
                    }
                }
                sample = samples.next() => sample,
            };

            let Some(state) = sample else {
                return Err(IndexError::Unavailable(
                    "wallet state stream ended before funds arrived".into(),
                ));
            };

            if !throttle.admit(Instant::now()) {
                continue;
            }

            let remaining = remaining_to_sync(&state, &self.config);
            info!(
                synced = state.synced(),
                remaining,
                "Waiting for funds. Backend lag progress"
            );
            if remaining >= self.config.sync_threshold {
                continue;
            }

            let balance = state.native_balance();
            if balance > 0 {
                info!(balance = %balance, "Wallet funded");
                return Ok(balance);
            }
            debug!("Wallet synced, native balance still zero");
        }
    }
}
