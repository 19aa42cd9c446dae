//! # Page Board Service
//!
//! One page bound to one identity. Reads always go to the ledger; a page has
//! no subscription and no cached view.

use std::sync::Arc;

use index_telemetry::{log_event, log_tx_event};
use mi_01_private_state::PrivateStateStore;
use mi_05_contract_session::{resolve_identity, SessionConfig};
use shared_types::{
    ContractAddress, Identity, IndexError, PageOperation, PageState, TransactionReceipt,
};
use tracing::{debug, warn};

use crate::domain::{decode_page, validate_message, validate_title, PageContract};
use crate::ports::{PageCall, PageLedger};

const SUBSYSTEM: &str = "page-board";

/// Providers a page is built from.
#[derive(Clone)]
pub struct PageDeps {
    /// Page ledger.
    pub ledger: Arc<dyn PageLedger>,
    /// Private state store; page identities live beside index identities.
    pub store: Arc<dyn PrivateStateStore>,
    /// Identity scoping and submission timeout.
    pub config: SessionConfig,
}

/// Handle on one page contract.
pub struct PageBoard {
    address: ContractAddress,
    identity: Identity,
    deps: PageDeps,
    mutation_lock: tokio::sync::Mutex<()>,
}

impl PageBoard {
    /// Deploy a new, vacant page.
    pub async fn deploy(deps: PageDeps) -> Result<Self, IndexError> {
        let deployed = deps.ledger.deploy_page().await.map_err(|failure| {
            warn!(error = %failure, "Page deployment failed");
            IndexError::from(failure)
        })?;
        log_tx_event!(
            info,
            SUBSYSTEM,
            "Deployed page",
            deployed.receipt.transaction_id,
            deployed.receipt.block_height,
            address = %deployed.address
        );
        Self::bind(deps, deployed.address).await
    }

    /// Open an existing page. Fails with `NotFound` if nothing is deployed.
    pub async fn open(deps: PageDeps, address: ContractAddress) -> Result<Self, IndexError> {
        let page = read_page(deps.ledger.as_ref(), &address).await?;
        log_event!(
            info,
            SUBSYSTEM,
            "Opened page",
            address = %address,
            sequence = page.sequence
        );
        Self::bind(deps, address).await
    }

    async fn bind(deps: PageDeps, address: ContractAddress) -> Result<Self, IndexError> {
        let identity = resolve_identity(deps.store.as_ref(), &deps.config, &address).await?;
        Ok(Self {
            address,
            identity,
            deps,
            mutation_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Address of the page contract.
    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// Identity this handle acts as.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Fresh read of the page.
    pub async fn state(&self) -> Result<PageState, IndexError> {
        read_page(self.deps.ledger.as_ref(), &self.address).await
    }

    /// True if this identity posted the current content.
    pub async fn is_owner(&self) -> Result<bool, IndexError> {
        let page = self.state().await?;
        Ok(PageContract::is_poster(&page, &self.identity.secret_key))
    }

    /// Post `message` to a vacant page.
    pub async fn post(&self, message: &str) -> Result<TransactionReceipt, IndexError> {
        let message = validate_message(message)?;
        self.submit(PageOperation::Post {
            message: message.to_string(),
        })
        .await
    }

    /// Take the current post down.
    pub async fn take_down(&self) -> Result<TransactionReceipt, IndexError> {
        self.submit(PageOperation::TakeDown).await
    }

    /// Replace the title.
    pub async fn update_title(&self, title: &str) -> Result<TransactionReceipt, IndexError> {
        let title = validate_title(title)?;
        self.submit(PageOperation::UpdateTitle {
            title: title.to_string(),
        })
        .await
    }

    /// Replace the description; empty clears it.
    pub async fn update_description(
        &self,
        description: &str,
    ) -> Result<TransactionReceipt, IndexError> {
        self.submit(PageOperation::UpdateDescription {
            description: description.trim().to_string(),
        })
        .await
    }

    /// Hide the page from public listings, or list it again.
    pub async fn set_private_web(&self, private: bool) -> Result<TransactionReceipt, IndexError> {
        self.submit(PageOperation::SetPrivateWeb { private }).await
    }

    async fn submit(&self, operation: PageOperation) -> Result<TransactionReceipt, IndexError> {
        let _serialized = self.mutation_lock.lock().await;

        let circuit = operation.circuit_name();
        debug!(address = %self.address, circuit, "Submitting page transaction");

        let call = PageCall {
            contract: self.address.clone(),
            operation,
            identity: self.identity.clone(),
        };
        let ledger = self.deps.ledger.clone();
        let in_flight = tokio::spawn(async move { ledger.submit_page(call).await });

        let limit = self.deps.config.submission_timeout;
        let receipt = match tokio::time::timeout(limit, in_flight).await {
            Err(_) => {
                warn!(
                    address = %self.address,
                    circuit,
                    timeout_ms = limit.as_millis() as u64,
                    "Page submission timed out; transaction left in flight"
                );
                return Err(IndexError::Submission(format!("{circuit} timed out")));
            }
            Ok(Err(join_error)) => {
                return Err(IndexError::Submission(format!(
                    "{circuit} submission task failed: {join_error}"
                )));
            }
            Ok(Ok(Err(failure))) => {
                warn!(address = %self.address, circuit, error = %failure, "Page transaction rejected");
                return Err(IndexError::from(failure));
            }
            Ok(Ok(Ok(receipt))) => receipt,
        };

        log_tx_event!(
            info,
            SUBSYSTEM,
            "Page transaction added",
            receipt.transaction_id,
            receipt.block_height,
            address = %self.address,
            circuit = circuit
        );
        Ok(receipt)
    }
}

async fn read_page(ledger: &dyn PageLedger, address: &ContractAddress) -> Result<PageState, IndexError> {
    let raw = ledger
        .query_page(address)
        .await?
        .ok_or_else(|| IndexError::NotFound(address.clone()))?;
    decode_page(&raw)
}
