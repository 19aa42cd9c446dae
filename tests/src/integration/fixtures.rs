//! Shared setup: one standalone ledger, any number of participants.

use std::sync::Arc;
use std::time::Duration;

use ledger_sim::{LedgerSimConfig, SimulatedLedger};
use mi_01_private_state::{InMemoryPrivateStateStore, PrivateStateStore};
use mi_02_public_state::{PublicStateReader, ReaderConfig};
use mi_05_contract_session::{ContractSession, SessionConfig, SessionDeps};
use mi_06_index_registry::IndexRegistry;
use mi_08_page_board::{PageBoard, PageDeps};
use shared_bus::InMemoryEventBus;
use shared_types::{ContractAddress, DerivedState};

/// Upper bound for any awaited state change.
pub const WAIT: Duration = Duration::from_secs(2);

/// One ledger and one bus shared by every participant.
pub struct TestNetwork {
    pub ledger: Arc<SimulatedLedger>,
    pub bus: Arc<InMemoryEventBus>,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(SimulatedLedger::new(LedgerSimConfig::for_testing())),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    /// Participant with its own in-memory identity store.
    pub fn participant(&self, user: &str) -> Participant {
        self.participant_with_store(user, Arc::new(InMemoryPrivateStateStore::new()))
    }

    /// Participant backed by `store`.
    pub fn participant_with_store(
        &self,
        user: &str,
        store: Arc<dyn PrivateStateStore>,
    ) -> Participant {
        Participant {
            deps: SessionDeps {
                reader: PublicStateReader::new(self.ledger.clone(), ReaderConfig::for_testing()),
                store,
                submitter: self.ledger.clone(),
                bus: self.bus.clone(),
            },
            config: SessionConfig::for_testing().with_user(user),
        }
    }
}

/// A principal talking to the network.
pub struct Participant {
    pub deps: SessionDeps,
    pub config: SessionConfig,
}

impl Participant {
    /// Deploy a contract and claim it.
    pub async fn deploy(&self) -> IndexRegistry {
        let session = ContractSession::deploy(self.deps.clone(), self.config.clone())
            .await
            .unwrap();
        let registry = IndexRegistry::new(Arc::new(session));
        registry.initialize().await.unwrap();
        registry
    }

    /// Deploy a vacant page with this participant's identity store.
    pub async fn deploy_page(&self, network: &TestNetwork) -> PageBoard {
        PageBoard::deploy(self.page_deps(network)).await.unwrap()
    }

    /// Open an existing page.
    pub async fn open_page(&self, network: &TestNetwork, address: &ContractAddress) -> PageBoard {
        PageBoard::open(self.page_deps(network), address.clone())
            .await
            .unwrap()
    }

    fn page_deps(&self, network: &TestNetwork) -> PageDeps {
        PageDeps {
            ledger: network.ledger.clone(),
            store: self.deps.store.clone(),
            config: self.config.clone(),
        }
    }

    /// Join an existing contract.
    pub async fn join(&self, address: &ContractAddress) -> IndexRegistry {
        let session = ContractSession::join(self.deps.clone(), address.clone(), self.config.clone())
            .await
            .unwrap();
        IndexRegistry::new(Arc::new(session))
    }
}

/// Wait until the registry's derived state satisfies `predicate`.
pub async fn settle(
    registry: &IndexRegistry,
    predicate: impl Fn(&DerivedState) -> bool,
) -> DerivedState {
    registry.session().wait_for(predicate, WAIT).await.unwrap()
}
