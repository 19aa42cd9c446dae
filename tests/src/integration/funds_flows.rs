//! # Funds Flows
//!
//! The readiness gate observing the simulated wallet.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ledger_sim::SimulatedWallet;
    use mi_04_funds_gate::{FundsGateConfig, FundsReadinessGate, WalletStateSource};
    use shared_types::IndexError;
    use tokio::sync::watch;

    fn gate() -> FundsReadinessGate {
        FundsReadinessGate::new(FundsGateConfig {
            sample_interval: Duration::ZERO,
            ..FundsGateConfig::for_testing()
        })
    }

    #[tokio::test]
    async fn test_gap_of_200_waits_then_gap_of_1_resolves() {
        let wallet = Arc::new(SimulatedWallet::new());
        wallet.set_sync(800, 1000);
        wallet.fund(5);
        let (_shutdown_tx, shutdown) = watch::channel(false);

        // Funded but 200 behind: the balance is not trusted yet.
        let samples = wallet.subscribe();
        let waiting = tokio::spawn(async move { gate().wait_for_funds(samples, shutdown).await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiting.is_finished());

        wallet.set_sync(999, 1000);
        let balance = tokio::time::timeout(Duration::from_secs(2), waiting)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(balance, 5);
    }

    #[tokio::test]
    async fn test_synced_but_empty_wallet_waits_for_funding() {
        let wallet = Arc::new(SimulatedWallet::new());
        wallet.set_sync(1000, 1000);
        let (_shutdown_tx, shutdown) = watch::channel(false);

        let waiting = {
            let wallet = wallet.clone();
            tokio::spawn(async move { gate().ensure_funded(wallet.as_ref(), shutdown).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiting.is_finished());

        wallet.fund(1_000);
        let balance = tokio::time::timeout(Duration::from_secs(2), waiting)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(balance, 1_000);
    }

    #[tokio::test]
    async fn test_genesis_wallet_passes_immediately() {
        let wallet = SimulatedWallet::genesis(7);
        let (_shutdown_tx, shutdown) = watch::channel(false);
        assert_eq!(gate().ensure_funded(&wallet, shutdown).await, Ok(7));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_wait() {
        let wallet = Arc::new(SimulatedWallet::new());
        let (shutdown_tx, shutdown) = watch::channel(false);

        let waiting = {
            let wallet = wallet.clone();
            tokio::spawn(async move { gate().ensure_funded(wallet.as_ref(), shutdown).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown_tx.send_replace(true);

        let result = tokio::time::timeout(Duration::from_secs(2), waiting)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(IndexError::Cancelled));
    }
}
