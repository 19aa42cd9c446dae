//! # Node Runtime
//!
//! Startup sequence shared by both modes:
//!
//! 1. Wait for a synced, funded wallet (cancellable by shutdown)
//! 2. Deploy or join the main index contract
//! 3. Drive the interactive menu, or serve the HTTP API until shutdown

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mi_04_funds_gate::FundsReadinessGate;
use mi_05_contract_session::ContractSession;
use mi_06_index_registry::IndexRegistry;
use mi_07_api_gateway::{ApiGateway, GatewayState};
use shared_types::{ContractAddress, IndexError};
use tokio::io::AsyncBufRead;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::CommandDispatcher;
use crate::container::ProviderContainer;

/// Attempts made by [`read_with_retry`] callers in the menu.
pub const READ_ATTEMPTS: u32 = 3;

/// Pause between read attempts.
pub const READ_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Run an idempotent read, retrying while it fails with a retryable error.
///
/// Never use this for mutations.
pub async fn read_with_retry<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut read: F,
) -> Result<T, IndexError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, IndexError>>,
{
    let mut attempt = 1;
    loop {
        match read().await {
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(attempt, error = %e, "Read failed, retrying");
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}

/// The node runtime owning the providers and the shutdown signal.
pub struct NodeRuntime {
    container: Arc<ProviderContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a runtime around built providers.
    pub fn new(container: ProviderContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// The providers.
    pub fn container(&self) -> &ProviderContainer {
        &self.container
    }

    /// Receiver that flips to `true` on shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Ask every long-running task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.shutdown_tx.send_replace(true);
    }

    /// Block until the wallet is synced and holds native funds.
    pub async fn ensure_funded(&self) -> Result<u128, IndexError> {
        let gate = FundsReadinessGate::new(self.container.config.funds_gate_config());
        let balance = gate
            .ensure_funded(self.container.wallet_source(), self.shutdown_signal())
            .await?;
        info!(balance = %balance, "Wallet balance");
        Ok(balance)
    }

    /// Deploy a new index contract and claim it.
    pub async fn deploy_registry(&self) -> Result<IndexRegistry, IndexError> {
        info!("Deploying main index contract...");
        let session =
            ContractSession::deploy(self.container.session_deps(), self.container.session_config())
                .await?;
        let registry = IndexRegistry::new(Arc::new(session));
        registry.initialize().await?;
        info!(address = %registry.address(), "Main index contract deployed and initialized");
        Ok(registry)
    }

    /// Join an existing index contract.
    pub async fn join_registry(&self, address: ContractAddress) -> Result<IndexRegistry, IndexError> {
        info!(address = %address, "Joining main index contract...");
        let session = ContractSession::join(
            self.container.session_deps(),
            address,
            self.container.session_config(),
        )
        .await?;
        Ok(IndexRegistry::new(Arc::new(session)))
    }

    /// Join `address` when given, deploy otherwise.
    pub async fn open_registry(
        &self,
        address: Option<ContractAddress>,
    ) -> Result<IndexRegistry, IndexError> {
        match address {
            Some(address) => self.join_registry(address).await,
            None => self.deploy_registry().await,
        }
    }

    /// Interactive mode: funds wait, contract selection, then the main menu.
    ///
    /// With `address` set the contract is joined without the start menu.
    pub async fn run_cli<R, W>(
        &self,
        input: R,
        output: W,
        address: Option<ContractAddress>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut dispatcher = CommandDispatcher::new(input, output, self.shutdown_signal());

        self.ensure_funded().await?;

        let registry = match address {
            Some(address) => Some(self.join_registry(address).await?),
            None => dispatcher.choose_contract(self).await?,
        };
        let Some(registry) = registry else {
            info!("No contract opened");
            return Ok(());
        };
        let outcome = dispatcher.run_menu(self, &registry).await;
        registry.session().close().await;
        outcome
    }

    /// Server mode: the API answers `/health` at once and the index routes
    /// once the wallet is funded and the contract is open.
    pub async fn run_server(&self, address: Option<ContractAddress>) -> Result<()> {
        let gateway = ApiGateway::new(self.container.config.api_config());
        let state = gateway.state();
        state.set_page_deps(self.container.page_deps());
        state.set_providers_ready(true);

        let shutdown = self.shutdown_signal();
        let server = tokio::spawn(async move { gateway.serve(shutdown).await });

        let connected = self.connect_main_index(&state, address).await;
        if let Err(e) = &connected {
            warn!(error = %e, "Main index unavailable; stopping API server");
            self.shutdown();
        }

        let served = server.await.context("API server task failed")?;
        if let Some(registry) = state.registry() {
            registry.session().close().await;
        }
        connected?;
        served?;
        Ok(())
    }

    async fn connect_main_index(
        &self,
        state: &GatewayState,
        address: Option<ContractAddress>,
    ) -> Result<(), IndexError> {
        self.ensure_funded().await?;
        state.set_wallet_ready(true);

        let registry = self.open_registry(address).await?;
        info!(address = %registry.address(), "Main index API ready");
        state.connect(registry);
        Ok(())
    }
}
