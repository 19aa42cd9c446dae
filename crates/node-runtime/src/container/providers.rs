//! # Provider Container
//!
//! Builds the providers in dependency order:
//!
//! ```text
//! Level 0: event bus, standalone ledger, wallet
//! Level 1: private state store (file, locked), public state reader
//! Level 2: session dependencies (reader + store + submitter + bus),
//!          page dependencies (ledger + store)
//! ```

use std::sync::Arc;

use ledger_sim::{SimulatedLedger, SimulatedWallet};
use mi_01_private_state::{FilePrivateStateStore, PrivateStateConfig, PrivateStateStore};
use mi_02_public_state::PublicStateReader;
use mi_04_funds_gate::WalletStateSource;
use mi_05_contract_session::{SessionConfig, SessionDeps};
use mi_08_page_board::PageDeps;
use shared_bus::InMemoryEventBus;
use shared_types::IndexError;
use tracing::{info, instrument};

use crate::container::config::NodeConfig;

/// Process-wide providers.
pub struct ProviderContainer {
    /// Node configuration.
    pub config: NodeConfig,
    /// Standalone ledger, also the prover and submitter.
    pub ledger: Arc<SimulatedLedger>,
    /// Wallet observed by the funds gate.
    pub wallet: Arc<SimulatedWallet>,
    /// Identity storage shared by every session.
    pub store: Arc<dyn PrivateStateStore>,
    /// Event bus shared by every session.
    pub bus: Arc<InMemoryEventBus>,
    reader: PublicStateReader,
}

impl ProviderContainer {
    /// Build every provider with the file-backed identity store.
    #[instrument(skip(config), name = "providers")]
    pub fn new(config: NodeConfig) -> Result<Self, IndexError> {
        let store = FilePrivateStateStore::open(&PrivateStateConfig::in_dir(
            &config.private_state.dir,
        ))?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build every provider around an existing identity store.
    pub fn with_store(config: NodeConfig, store: Arc<dyn PrivateStateStore>) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(SimulatedLedger::new(config.ledger_sim_config()));

        let wallet = if config.wallet.is_genesis() {
            info!("Using the genesis mint wallet of the standalone network");
            SimulatedWallet::genesis(config.wallet.genesis_balance)
        } else {
            info!("Using a fresh wallet; funds must be transferred to it");
            SimulatedWallet::new()
        };

        let reader = PublicStateReader::new(ledger.clone(), config.reader_config())
            .with_bus(bus.clone());

        info!(
            user = %config.private_state.user,
            scope = ?config.private_state.scope,
            "Providers initialized"
        );

        Self {
            config,
            ledger,
            wallet: Arc::new(wallet),
            store,
            bus,
            reader,
        }
    }

    /// Dependencies for a new contract session.
    pub fn session_deps(&self) -> SessionDeps {
        SessionDeps {
            reader: self.reader.clone(),
            store: self.store.clone(),
            submitter: self.ledger.clone(),
            bus: self.bus.clone(),
        }
    }

    /// Dependencies for page deployments. Page identities share the store
    /// and its scoping with index identities.
    pub fn page_deps(&self) -> PageDeps {
        PageDeps {
            ledger: self.ledger.clone(),
            store: self.store.clone(),
            config: self.session_config(),
        }
    }

    /// Session settings from the node configuration.
    pub fn session_config(&self) -> SessionConfig {
        self.config.session_config()
    }

    /// Public state reader.
    pub fn reader(&self) -> &PublicStateReader {
        &self.reader
    }

    /// The wallet as the funds gate sees it.
    pub fn wallet_source(&self) -> &dyn WalletStateSource {
        self.wallet.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mi_01_private_state::InMemoryPrivateStateStore;

    #[test]
    fn test_genesis_wallet_funded() {
        let container =
            ProviderContainer::with_store(NodeConfig::default(), Arc::new(InMemoryPrivateStateStore::new()));
        assert!(container.wallet.state().native_balance() > 0);
    }

    #[tokio::test]
    async fn test_page_deps_deploy_on_shared_ledger() {
        let container =
            ProviderContainer::with_store(NodeConfig::for_testing(), Arc::new(InMemoryPrivateStateStore::new()));
        let page = mi_08_page_board::PageBoard::deploy(container.page_deps())
            .await
            .unwrap();
        assert!(container.ledger.page(page.address()).is_some());
        assert!(container.ledger.contracts().is_empty());
    }

    #[test]
    fn test_custom_seed_wallet_empty() {
        let mut config = NodeConfig::default();
        config.wallet.seed = Some("ab".repeat(32));
        let container = ProviderContainer::with_store(config, Arc::new(InMemoryPrivateStateStore::new()));
        assert_eq!(container.wallet.state().native_balance(), 0);
    }

    #[test]
    fn test_file_store_is_locked_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::default();
        config.private_state.dir = dir.path().to_path_buf();

        let _first = ProviderContainer::new(config.clone()).unwrap();
        assert!(matches!(
            ProviderContainer::new(config),
            Err(IndexError::Storage(_))
        ));
    }
}
