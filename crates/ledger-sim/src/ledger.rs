//! # Simulated Ledger
//!
//! Contract states by address. Each accepted transaction runs the index or
//! page contract's rules against the stored state and bumps the block height.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use mi_02_public_state::{encode_state, LedgerQuery};
use mi_05_contract_session::{CircuitCall, TransactionSubmitter};
use mi_06_index_registry::IndexContract;
use mi_08_page_board::{encode_page, PageCall, PageContract, PageLedger};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use shared_types::{
    ContractAddress, DeployReceipt, IndexError, PageState, PublicState, SubmissionFailure,
    TransactionReceipt,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LedgerSimConfig;

/// In-process ledger running the main index and page contracts.
pub struct SimulatedLedger {
    config: LedgerSimConfig,
    contracts: RwLock<HashMap<ContractAddress, PublicState>>,
    pages: RwLock<HashMap<ContractAddress, PageState>>,
    height: AtomicU64,
    rng: Mutex<StdRng>,
    failing_queries: AtomicU32,
    submission_failure: Mutex<Option<SubmissionFailure>>,
}

impl SimulatedLedger {
    /// Create an empty ledger at height 0.
    pub fn new(config: LedgerSimConfig) -> Self {
        let rng = match config.address_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            contracts: RwLock::new(HashMap::new()),
            pages: RwLock::new(HashMap::new()),
            height: AtomicU64::new(0),
            rng: Mutex::new(rng),
            failing_queries: AtomicU32::new(0),
            submission_failure: Mutex::new(None),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &LedgerSimConfig {
        &self.config
    }

    /// Current block height.
    pub fn block_height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    /// Decoded state of the contract at `address`.
    pub fn state(&self, address: &ContractAddress) -> Option<PublicState> {
        self.contracts.read().get(address).cloned()
    }

    /// Decoded state of the page at `address`.
    pub fn page(&self, address: &ContractAddress) -> Option<PageState> {
        self.pages.read().get(address).cloned()
    }

    /// Addresses of every deployed index contract.
    pub fn contracts(&self) -> Vec<ContractAddress> {
        let mut addresses: Vec<_> = self.contracts.read().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    /// Make the next `count` state queries fail with `Unavailable`.
    pub fn fail_next_queries(&self, count: u32) {
        self.failing_queries.store(count, Ordering::SeqCst);
    }

    /// Fail every following submission with `failure`, or stop failing.
    pub fn fail_submissions(&self, failure: Option<SubmissionFailure>) {
        *self.submission_failure.lock() = failure;
    }

    /// Deploy a contract with the genesis state at a fresh address.
    pub fn deploy_contract(&self) -> DeployReceipt {
        let address = self.fresh_address();
        self.contracts
            .write()
            .insert(address.clone(), IndexContract::genesis());
        let receipt = self.next_receipt();
        info!(
            address = %address,
            block_height = receipt.block_height,
            "Contract deployed"
        );
        DeployReceipt { address, receipt }
    }

    /// Deploy a vacant page at a fresh address.
    pub fn deploy_page_contract(&self) -> DeployReceipt {
        let address = self.fresh_address();
        self.pages
            .write()
            .insert(address.clone(), PageContract::genesis());
        let receipt = self.next_receipt();
        info!(
            address = %address,
            block_height = receipt.block_height,
            "Page deployed"
        );
        DeployReceipt { address, receipt }
    }

    fn fresh_address(&self) -> ContractAddress {
        let mut bytes = [0u8; 32];
        self.rng.lock().fill_bytes(&mut bytes);
        ContractAddress::from_bytes(&bytes)
    }

    fn check_submission_failure(&self) -> Result<(), SubmissionFailure> {
        match self.submission_failure.lock().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn next_receipt(&self) -> TransactionReceipt {
        TransactionReceipt {
            transaction_id: Uuid::new_v4().to_string(),
            block_height: self.height.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    fn take_query_fault(&self) -> bool {
        self.failing_queries
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn include_delay(&self) {
        if !self.config.block_time.is_zero() {
            tokio::time::sleep(self.config.block_time).await;
        }
    }
}

#[async_trait]
impl LedgerQuery for SimulatedLedger {
    async fn query_state(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError> {
        if self.take_query_fault() {
            return Err(IndexError::Unavailable("simulated indexer outage".into()));
        }
        match self.state(address) {
            Some(state) => encode_state(&state).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TransactionSubmitter for SimulatedLedger {
    async fn deploy(&self) -> Result<DeployReceipt, SubmissionFailure> {
        self.include_delay().await;
        self.check_submission_failure()?;
        Ok(self.deploy_contract())
    }

    async fn submit(&self, call: CircuitCall) -> Result<TransactionReceipt, SubmissionFailure> {
        self.include_delay().await;
        self.check_submission_failure()?;

        let circuit = call.operation.circuit_name();
        let mut contracts = self.contracts.write();
        let current = contracts
            .get(&call.contract)
            .ok_or_else(|| SubmissionFailure::UnknownContract(call.contract.clone()))?;

        let next = IndexContract::execute(current, &call.operation, &call.identity.secret_key)
            .map_err(|rejection| {
                warn!(address = %call.contract, circuit, reason = %rejection, "Transaction rejected");
                SubmissionFailure::Rejected(rejection)
            })?;
        debug!(
            address = %call.contract,
            circuit,
            sequence = next.sequence,
            entries = next.entry_count,
            "Transaction applied"
        );
        contracts.insert(call.contract, next);
        Ok(self.next_receipt())
    }
}

#[async_trait]
impl PageLedger for SimulatedLedger {
    async fn deploy_page(&self) -> Result<DeployReceipt, SubmissionFailure> {
        self.include_delay().await;
        self.check_submission_failure()?;
        Ok(self.deploy_page_contract())
    }

    async fn query_page(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError> {
        if self.take_query_fault() {
            return Err(IndexError::Unavailable("simulated indexer outage".into()));
        }
        self.page(address).as_ref().map(encode_page).transpose()
    }

    async fn submit_page(&self, call: PageCall) -> Result<TransactionReceipt, SubmissionFailure> {
        self.include_delay().await;
        self.check_submission_failure()?;

        let circuit = call.operation.circuit_name();
        let mut pages = self.pages.write();
        let current = pages
            .get(&call.contract)
            .ok_or_else(|| SubmissionFailure::UnknownContract(call.contract.clone()))?;

        let next = PageContract::execute(current, &call.operation, &call.identity.secret_key)
            .map_err(|rejection| {
                warn!(address = %call.contract, circuit, reason = %rejection, "Page transaction rejected");
                SubmissionFailure::Rejected(rejection)
            })?;
        debug!(
            address = %call.contract,
            circuit,
            sequence = next.sequence,
            state = ?next.state,
            "Page transaction applied"
        );
        pages.insert(call.contract, next);
        Ok(self.next_receipt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mi_02_public_state::decode_state;
    use mi_08_page_board::decode_page;
    use shared_types::{BoardState, Identity, IndexOperation, LedgerRejection, PageOperation, SecretKey};

    fn ledger() -> SimulatedLedger {
        SimulatedLedger::new(LedgerSimConfig::for_testing())
    }

    fn call(address: &ContractAddress, operation: IndexOperation, byte: u8) -> CircuitCall {
        CircuitCall {
            contract: address.clone(),
            operation,
            identity: Identity::new(SecretKey::from_bytes([byte; 32])),
        }
    }

    #[tokio::test]
    async fn test_deploy_and_query_genesis() {
        let ledger = ledger();
        let deployed = ledger.deploy().await.unwrap();
        assert_eq!(deployed.receipt.block_height, 1);

        let raw = ledger.query_state(&deployed.address).await.unwrap().unwrap();
        assert_eq!(decode_state(&raw).unwrap(), PublicState::initial());
    }

    #[test]
    fn test_seeded_ledgers_agree_on_genesis() {
        let a = ledger();
        let b = ledger();
        let da = a.deploy_contract();
        let db = b.deploy_contract();
        assert_eq!(da.address, db.address);
        assert_eq!(a.state(&da.address), b.state(&db.address));
    }

    #[tokio::test]
    async fn test_unknown_contract() {
        let ledger = ledger();
        let address = ContractAddress::parse("0x1234").unwrap();
        assert_eq!(ledger.query_state(&address).await.unwrap(), None);
        assert_eq!(
            ledger.submit(call(&address, IndexOperation::Initialize, 1)).await,
            Err(SubmissionFailure::UnknownContract(address))
        );
    }

    #[tokio::test]
    async fn test_rejection_leaves_state_unchanged() {
        let ledger = ledger();
        let address = ledger.deploy_contract().address;
        ledger
            .submit(call(&address, IndexOperation::Initialize, 1))
            .await
            .unwrap();
        let before = ledger.state(&address);
        let height = ledger.block_height();

        let result = ledger
            .submit(call(&address, IndexOperation::RemoveAllAddresses, 2))
            .await;
        assert_eq!(result, Err(SubmissionFailure::Rejected(LedgerRejection::NotOwner)));
        assert_eq!(ledger.state(&address), before);
        assert_eq!(ledger.block_height(), height);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let ledger = ledger();
        let address = ledger.deploy_contract().address;

        ledger.fail_next_queries(1);
        assert!(matches!(
            ledger.query_state(&address).await,
            Err(IndexError::Unavailable(_))
        ));
        assert!(ledger.query_state(&address).await.unwrap().is_some());

        ledger.fail_submissions(Some(SubmissionFailure::Network("partitioned".into())));
        assert!(ledger
            .submit(call(&address, IndexOperation::Initialize, 1))
            .await
            .is_err());
        ledger.fail_submissions(None);
        assert!(ledger
            .submit(call(&address, IndexOperation::Initialize, 1))
            .await
            .is_ok());
    }

    fn page_call(address: &ContractAddress, operation: PageOperation, byte: u8) -> PageCall {
        PageCall {
            contract: address.clone(),
            operation,
            identity: Identity::new(SecretKey::from_bytes([byte; 32])),
        }
    }

    #[tokio::test]
    async fn test_pages_and_indexes_are_separate() {
        let ledger = ledger();
        let index = ledger.deploy_contract().address;
        let page = ledger.deploy_page().await.unwrap().address;
        assert_ne!(index, page);

        assert_eq!(ledger.query_state(&page).await.unwrap(), None);
        assert_eq!(ledger.query_page(&index).await.unwrap(), None);
        assert_eq!(ledger.contracts(), vec![index]);

        let raw = ledger.query_page(&page).await.unwrap().unwrap();
        assert_eq!(decode_page(&raw).unwrap(), PageState::initial());
    }

    #[tokio::test]
    async fn test_page_rejection_leaves_state_unchanged() {
        let ledger = ledger();
        let page = ledger.deploy_page_contract().address;
        ledger
            .submit_page(page_call(&page, PageOperation::Post { message: "hi".into() }, 1))
            .await
            .unwrap();
        let before = ledger.page(&page);
        let height = ledger.block_height();

        let result = ledger
            .submit_page(page_call(&page, PageOperation::Post { message: "mine".into() }, 2))
            .await;
        assert_eq!(
            result,
            Err(SubmissionFailure::Rejected(LedgerRejection::BoardOccupied))
        );
        assert_eq!(ledger.page(&page), before);
        assert_eq!(ledger.block_height(), height);
        assert_eq!(before.map(|p| p.state), Some(BoardState::Occupied));
    }
}
