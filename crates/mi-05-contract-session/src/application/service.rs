//! # Contract Session Service
//!
//! Reference flow:
//!
//! 1. `deploy` / `join` resolves the contract and the identity.
//! 2. `start` subscribes to public state and spawns the combinator.
//! 3. Mutations run one at a time under the mutation lock; each submission
//!    is spawned so that a timeout detaches it instead of cancelling it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use index_telemetry::{log_event, log_tx_event};
use mi_01_private_state::PrivateStateStore;
use mi_02_public_state::{PublicStateReader, StateSubscription};
use mi_03_ownership::OwnershipDeriver;
use parking_lot::Mutex;
use shared_bus::{EventFilter, EventPublisher, InMemoryEventBus, IndexEvent, Subscription};
use shared_types::{
    ContractAddress, DerivedState, Identity, IndexError, IndexOperation, PublicState,
    TransactionReceipt,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::stream::DerivedStateStream;
use crate::config::SessionConfig;
use crate::domain::{generate_identity, identity_key, lookup_order, ContractInfo, SessionView};
use crate::ports::{CircuitCall, TransactionSubmitter};

const SUBSYSTEM: &str = "contract-session";

/// Providers a session is built from. Shared by every session of a process.
#[derive(Clone)]
pub struct SessionDeps {
    /// Public state reader.
    pub reader: PublicStateReader,
    /// Private state store.
    pub store: Arc<dyn PrivateStateStore>,
    /// Proving and submission collaborator.
    pub submitter: Arc<dyn TransactionSubmitter>,
    /// Event bus for derived states and receipts.
    pub bus: Arc<InMemoryEventBus>,
}

/// One contract bound to one identity.
pub struct ContractSession {
    address: ContractAddress,
    identity: Identity,
    deps: SessionDeps,
    config: SessionConfig,
    deriver: OwnershipDeriver,
    view: Arc<watch::Sender<SessionView>>,
    combinator: Mutex<Option<JoinHandle<()>>>,
    mutation_lock: tokio::sync::Mutex<()>,
    closed: AtomicBool,
}

impl ContractSession {
    /// Deploy a new contract and open a session on it.
    pub async fn deploy(deps: SessionDeps, config: SessionConfig) -> Result<Self, IndexError> {
        let deployed = deps.submitter.deploy().await.map_err(|failure| {
            warn!(error = %failure, "Contract deployment failed");
            IndexError::from(failure)
        })?;
        log_tx_event!(
            info,
            SUBSYSTEM,
            "Deployed contract",
            deployed.receipt.transaction_id,
            deployed.receipt.block_height,
            address = %deployed.address
        );

        let identity = resolve_identity(deps.store.as_ref(), &config, &deployed.address).await?;
        Ok(Self::start(deployed.address, identity, deps, config))
    }

    /// Open a session on an existing contract.
    ///
    /// Fails with `NotFound` when nothing is deployed at `address`.
    pub async fn join(
        deps: SessionDeps,
        address: ContractAddress,
        config: SessionConfig,
    ) -> Result<Self, IndexError> {
        let state = deps.reader.query_once(&address).await?;
        log_event!(
            info,
            SUBSYSTEM,
            "Joined contract",
            address = %address,
            sequence = state.sequence
        );

        let identity = resolve_identity(deps.store.as_ref(), &config, &address).await?;
        Ok(Self::start(address, identity, deps, config))
    }

    fn start(
        address: ContractAddress,
        identity: Identity,
        deps: SessionDeps,
        config: SessionConfig,
    ) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        let session = Self {
            address,
            identity,
            deps,
            config,
            deriver: OwnershipDeriver::new(),
            view: Arc::new(view),
            combinator: Mutex::new(None),
            mutation_lock: tokio::sync::Mutex::new(()),
            closed: AtomicBool::new(false),
        };
        session.spawn_combinator();
        session
    }

    fn spawn_combinator(&self) {
        let subscription = self.deps.reader.subscribe(self.address.clone());
        let task = tokio::spawn(run_combinator(
            subscription,
            self.identity.clone(),
            self.deriver,
            self.view.clone(),
            self.deps.bus.clone(),
        ));
        if let Some(previous) = self.combinator.lock().replace(task) {
            previous.abort();
        }
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    /// Contract address of this session.
    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// The identity this session acts as.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Latest derived state, `None` until the first snapshot arrived.
    ///
    /// Reflects accepted transactions only once the reader observed them.
    pub fn derive_state(&self) -> Option<DerivedState> {
        self.view.borrow().derived.clone()
    }

    /// Latest public snapshot.
    pub fn latest_public_state(&self) -> Option<PublicState> {
        self.view.borrow().public.clone()
    }

    /// Terminal read error, if the public-state stream failed.
    pub fn failure(&self) -> Option<IndexError> {
        self.view.borrow().failure.clone()
    }

    /// Address, sequence and owner of the latest snapshot.
    pub fn contract_info(&self) -> Option<ContractInfo> {
        self.view
            .borrow()
            .public
            .as_ref()
            .map(|state| ContractInfo::from_state(&self.address, state))
    }

    /// Fresh ledger read, bypassing the subscription.
    pub async fn query_public_state(&self) -> Result<PublicState, IndexError> {
        self.deps.reader.query_once(&self.address).await
    }

    /// New independent derived-state stream.
    pub fn subscribe(&self) -> DerivedStateStream {
        DerivedStateStream::new(self.view.subscribe())
    }

    /// Bus subscription restricted to this contract.
    pub fn subscribe_events(&self, filter: EventFilter) -> Subscription {
        self.deps
            .bus
            .subscribe(filter.for_address(self.address.clone()))
    }

    /// Wait until a derived state satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl Fn(&DerivedState) -> bool,
        limit: Duration,
    ) -> Result<DerivedState, IndexError> {
        let mut stream = self.subscribe();
        let wait = async {
            while let Some(item) = stream.next().await {
                let state = item?;
                if predicate(&state) {
                    return Ok(state);
                }
            }
            Err(IndexError::Unavailable("session closed".into()))
        };
        tokio::time::timeout(limit, wait).await.map_err(|_| {
            IndexError::Unavailable(format!(
                "expected state not observed within {}ms",
                limit.as_millis()
            ))
        })?
    }

    /// Restart the public-state subscription after a terminal read error.
    pub fn resync(&self) -> Result<(), IndexError> {
        self.ensure_open()?;
        self.view.send_modify(|view| view.failure = None);
        self.spawn_combinator();
        log_event!(
            info,
            SUBSYSTEM,
            "Public state subscription restarted",
            address = %self.address
        );
        Ok(())
    }

    // =========================================================================
    // WRITE SIDE
    // =========================================================================

    /// Establish the caller as owner.
    ///
    /// Not validated locally: the ledger rejects it when the contract is
    /// already initialized or owned by someone else.
    pub async fn initialize(&self) -> Result<TransactionReceipt, IndexError> {
        self.submit(IndexOperation::Initialize).await
    }

    /// Submit one owner-gated mutation as a single transaction.
    pub async fn mutate(&self, operation: IndexOperation) -> Result<TransactionReceipt, IndexError> {
        if !operation.is_mutation() {
            return Err(IndexError::Validation(format!(
                "{} is not a collection mutation",
                operation.circuit_name()
            )));
        }
        self.submit(operation).await
    }

    async fn submit(&self, operation: IndexOperation) -> Result<TransactionReceipt, IndexError> {
        self.ensure_open()?;
        let _serialized = self.mutation_lock.lock().await;

        let circuit = operation.circuit_name();
        debug!(address = %self.address, circuit, "Submitting transaction");

        let call = CircuitCall {
            contract: self.address.clone(),
            operation,
            identity: self.identity.clone(),
        };
        let submitter = self.deps.submitter.clone();
        let in_flight = tokio::spawn(async move { submitter.submit(call).await });

        let receipt = match tokio::time::timeout(self.config.submission_timeout, in_flight).await {
            Err(_) => {
                warn!(
                    address = %self.address,
                    circuit,
                    timeout_ms = self.config.submission_timeout.as_millis() as u64,
                    "Submission timed out; transaction left in flight"
                );
                return Err(IndexError::Submission(format!("{circuit} timed out")));
            }
            Ok(Err(join_error)) => {
                return Err(IndexError::Submission(format!(
                    "{circuit} submission task failed: {join_error}"
                )));
            }
            Ok(Ok(Err(failure))) => {
                warn!(address = %self.address, circuit, error = %failure, "Transaction rejected");
                return Err(IndexError::from(failure));
            }
            Ok(Ok(Ok(receipt))) => receipt,
        };

        log_tx_event!(
            info,
            SUBSYSTEM,
            "Transaction added",
            receipt.transaction_id,
            receipt.block_height,
            address = %self.address,
            circuit = circuit
        );
        self.deps
            .bus
            .publish(IndexEvent::TransactionSubmitted {
                address: self.address.clone(),
                circuit: circuit.to_string(),
                transaction_id: receipt.transaction_id.clone(),
                block_height: receipt.block_height,
            })
            .await;

        Ok(receipt)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Unsubscribe and end every derived-state stream.
    ///
    /// Submissions already in flight keep running.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self.combinator.lock().take() {
            task.abort();
        }
        self.view.send_modify(|view| view.closed = true);
        self.deps
            .bus
            .publish(IndexEvent::SessionClosed {
                address: self.address.clone(),
            })
            .await;
        log_event!(info, SUBSYSTEM, "Session closed", address = %self.address);
    }

    fn ensure_open(&self) -> Result<(), IndexError> {
        if self.is_closed() {
            return Err(IndexError::Validation(format!(
                "session for {} is closed",
                self.address
            )));
        }
        Ok(())
    }
}

impl Drop for ContractSession {
    fn drop(&mut self) {
        if let Some(task) = self.combinator.lock().take() {
            task.abort();
        }
    }
}

/// Find the identity for `address`, generating and persisting one if absent.
///
/// Looks up the keys of `config.scope` in order; a new identity is stored
/// under the primary key only.
pub async fn resolve_identity(
    store: &dyn PrivateStateStore,
    config: &SessionConfig,
    address: &ContractAddress,
) -> Result<Identity, IndexError> {
    for key in lookup_order(config.scope, &config.user, address) {
        if let Some(identity) = store.get(&key).await? {
            debug!(key = %key, "Using stored identity");
            return Ok(identity);
        }
    }

    let key = identity_key(config.scope, &config.user, address);
    let identity = generate_identity();
    store.set(&key, identity.clone()).await?;
    info!(key = %key, "Generated new identity");
    Ok(identity)
}

async fn run_combinator(
    mut subscription: StateSubscription,
    identity: Identity,
    deriver: OwnershipDeriver,
    view: Arc<watch::Sender<SessionView>>,
    bus: Arc<InMemoryEventBus>,
) {
    let address = subscription.address().clone();

    while let Some(update) = subscription.next_update().await {
        // A restarted subscription has no memory of what the view holds.
        if let Ok(public) = &update {
            let held = view.borrow().public.as_ref().map(|held| held.sequence);
            if let Some(held) = held.filter(|held| public.sequence < *held) {
                warn!(
                    address = %address,
                    held,
                    observed = public.sequence,
                    "Ignoring snapshot older than the session view"
                );
                continue;
            }
        }

        let derived = update.and_then(|public| {
            deriver
                .derive_state(&public, &identity)
                .map(|derived| (public, derived))
        });

        match derived {
            Ok((public, derived)) => {
                debug!(
                    address = %address,
                    sequence = derived.sequence,
                    entries = derived.entry_count,
                    is_owner = derived.is_owner,
                    "Derived state updated"
                );
                view.send_modify(|v| {
                    v.version += 1;
                    v.public = Some(public);
                    v.derived = Some(derived.clone());
                });
                bus.publish(IndexEvent::DerivedStateChanged {
                    address: address.clone(),
                    state: derived,
                })
                .await;
            }
            Err(err) => {
                warn!(address = %address, error = %err, "Derived state stream failed");
                view.send_modify(|v| v.failure = Some(err));
                return;
            }
        }
    }
}
