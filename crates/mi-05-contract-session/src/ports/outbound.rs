//! # Outbound Ports
//!
//! The proving and submission collaborator, consumed as "submit transaction,
//! get transaction id".

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    ContractAddress, DeployReceipt, Identity, IndexOperation, SubmissionFailure,
    TransactionReceipt,
};

/// A circuit call.
///
/// `identity` is private prover input. It is consumed by the prover and
/// never published on the ledger.
#[derive(Debug, Clone)]
pub struct CircuitCall {
    /// Target contract.
    pub contract: ContractAddress,
    /// Circuit to call.
    pub operation: IndexOperation,
    /// Caller's private state.
    pub identity: Identity,
}

/// Transaction submitter - outbound port.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Deploy a new index contract.
    async fn deploy(&self) -> Result<DeployReceipt, SubmissionFailure>;

    /// Prove and submit one circuit call.
    async fn submit(&self, call: CircuitCall) -> Result<TransactionReceipt, SubmissionFailure>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock submitter recording every call.
#[derive(Default)]
pub struct MockSubmitter {
    /// Calls received, in order.
    pub calls: Mutex<Vec<(ContractAddress, IndexOperation)>>,
    /// Failure returned by the next submissions, if any.
    pub failure: Mutex<Option<SubmissionFailure>>,
    /// Artificial latency per submission.
    pub delay: Mutex<Duration>,
    height: AtomicU64,
}

impl MockSubmitter {
    /// Create a submitter that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following submission with `failure`.
    pub fn fail_with(&self, failure: SubmissionFailure) {
        *self.failure.lock() = Some(failure);
    }

    /// Delay every following submission by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// Operations submitted so far.
    pub fn operations(&self) -> Vec<IndexOperation> {
        self.calls.lock().iter().map(|(_, op)| op.clone()).collect()
    }

    fn next_receipt(&self) -> TransactionReceipt {
        let height = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        TransactionReceipt {
            transaction_id: format!("mock-tx-{height}"),
            block_height: height,
        }
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn deploy(&self) -> Result<DeployReceipt, SubmissionFailure> {
        if let Some(failure) = self.failure.lock().clone() {
            return Err(failure);
        }
        let receipt = self.next_receipt();
        let address = ContractAddress::parse(&format!("{:064x}", receipt.block_height))
            .map_err(|e| SubmissionFailure::Network(e.to_string()))?;
        Ok(DeployReceipt { address, receipt })
    }

    async fn submit(&self, call: CircuitCall) -> Result<TransactionReceipt, SubmissionFailure> {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().push((call.contract, call.operation));
        if let Some(failure) = self.failure.lock().clone() {
            return Err(failure);
        }
        Ok(self.next_receipt())
    }
}
