//! # Ports Module
//!
//! The ledger as seen by a page: deploy, read the raw state, submit a call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    ContractAddress, DeployReceipt, Identity, IndexError, PageOperation, PageState,
    SubmissionFailure, TransactionReceipt,
};

use crate::domain::{encode_page, PageContract};

/// A page circuit call. `identity` is private prover input.
#[derive(Debug, Clone)]
pub struct PageCall {
    /// Target page.
    pub contract: ContractAddress,
    /// Circuit to call.
    pub operation: PageOperation,
    /// Caller's private state.
    pub identity: Identity,
}

/// Page ledger - outbound port.
#[async_trait]
pub trait PageLedger: Send + Sync {
    /// Deploy a new, vacant page contract.
    async fn deploy_page(&self) -> Result<DeployReceipt, SubmissionFailure>;

    /// Raw state of the page at `address`, or `None` if nothing is deployed.
    async fn query_page(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError>;

    /// Prove and submit one page circuit call.
    async fn submit_page(&self, call: PageCall) -> Result<TransactionReceipt, SubmissionFailure>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory page ledger running `PageContract` directly.
#[derive(Default)]
pub struct MockPageLedger {
    pages: RwLock<HashMap<ContractAddress, PageState>>,
    height: AtomicU64,
    should_fail: AtomicBool,
}

impl MockPageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following submission with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Decoded state of a page, for assertions.
    pub fn page(&self, address: &ContractAddress) -> Option<PageState> {
        self.pages.read().get(address).cloned()
    }

    fn next_receipt(&self) -> TransactionReceipt {
        let height = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        TransactionReceipt {
            transaction_id: format!("mock-page-tx-{height}"),
            block_height: height,
        }
    }

    fn check_failing(&self) -> Result<(), SubmissionFailure> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SubmissionFailure::Network("mock ledger offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PageLedger for MockPageLedger {
    async fn deploy_page(&self) -> Result<DeployReceipt, SubmissionFailure> {
        self.check_failing()?;
        let receipt = self.next_receipt();
        let address = ContractAddress::parse(&format!("{:064x}", receipt.block_height))
            .map_err(|e| SubmissionFailure::Network(e.to_string()))?;
        self.pages
            .write()
            .insert(address.clone(), PageContract::genesis());
        Ok(DeployReceipt { address, receipt })
    }

    async fn query_page(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError> {
        self.pages.read().get(address).map(encode_page).transpose()
    }

    async fn submit_page(&self, call: PageCall) -> Result<TransactionReceipt, SubmissionFailure> {
        self.check_failing()?;
        let mut pages = self.pages.write();
        let current = pages
            .get(&call.contract)
            .ok_or_else(|| SubmissionFailure::UnknownContract(call.contract.clone()))?;
        let next = PageContract::execute(current, &call.operation, &call.identity.secret_key)
            .map_err(SubmissionFailure::Rejected)?;
        pages.insert(call.contract, next);
        Ok(self.next_receipt())
    }
}
