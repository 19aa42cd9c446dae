//! # Index Registry Service
//!
//! Collection API over a `ContractSession` bound to the main index.

use std::sync::Arc;

use mi_05_contract_session::{ContractInfo, ContractSession};
use serde::Serialize;
use shared_types::{
    ContractAddress, DerivedState, Entry, IndexError, IndexOperation, TransactionReceipt,
};
use index_telemetry::log_event;
use tracing::debug;

use crate::domain::{parse_entry, validate_entry};

const SUBSYSTEM: &str = "index-registry";

/// Fresh read of the contract's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressListing {
    /// Parsed entries, oldest first.
    pub entries: Vec<Entry>,
    /// Entry count as stored by the contract.
    pub entry_count: u64,
    /// Address, epoch and owner of the read snapshot.
    pub contract_info: ContractInfo,
}

/// Owner-gated collection operations on the main index.
#[derive(Clone)]
pub struct IndexRegistry {
    session: Arc<ContractSession>,
}

impl IndexRegistry {
    /// Wrap an open session.
    pub fn new(session: Arc<ContractSession>) -> Self {
        Self { session }
    }

    /// Underlying session.
    pub fn session(&self) -> &Arc<ContractSession> {
        &self.session
    }

    /// Address of the index contract.
    pub fn address(&self) -> &ContractAddress {
        self.session.address()
    }

    /// Claim ownership of the index.
    pub async fn initialize(&self) -> Result<TransactionReceipt, IndexError> {
        self.session.initialize().await
    }

    /// Validate and append `(address, title)`.
    pub async fn add_address(
        &self,
        address: &str,
        title: &str,
    ) -> Result<(Entry, TransactionReceipt), IndexError> {
        let entry = validate_entry(address, title)?;
        self.append(entry).await
    }

    /// Validate and append a raw `"address,title"` entry.
    pub async fn add_entry(&self, raw: &str) -> Result<(Entry, TransactionReceipt), IndexError> {
        let entry = parse_entry(raw)?;
        self.append(entry).await
    }

    async fn append(&self, entry: Entry) -> Result<(Entry, TransactionReceipt), IndexError> {
        let wire = entry.to_wire();
        debug!(contract = %self.address(), entry = %wire, "Adding address");
        let receipt = self
            .session
            .mutate(IndexOperation::AddAddress { entry: wire })
            .await?;
        log_event!(
            info,
            SUBSYSTEM,
            "Address added",
            contract = %self.address(),
            address = %entry.address,
            title = %entry.title
        );
        Ok((entry, receipt))
    }

    /// Remove the most recently added entry.
    pub async fn remove_first_address(&self) -> Result<TransactionReceipt, IndexError> {
        self.session.mutate(IndexOperation::RemoveFirstAddress).await
    }

    /// Remove every entry, keeping ownership.
    pub async fn remove_all_addresses(&self) -> Result<TransactionReceipt, IndexError> {
        self.session.mutate(IndexOperation::RemoveAllAddresses).await
    }

    /// Remove every entry and start a new epoch.
    ///
    /// The caller loses ownership until it initializes again.
    pub async fn clear(&self) -> Result<TransactionReceipt, IndexError> {
        self.session.mutate(IndexOperation::Clear).await
    }

    /// Entries of the latest derived state; empty before the first snapshot.
    pub fn entries(&self) -> Vec<Entry> {
        self.session
            .derive_state()
            .map(|state| state.parsed_entries())
            .unwrap_or_default()
    }

    /// Latest derived state.
    pub fn derived_state(&self) -> Option<DerivedState> {
        self.session.derive_state()
    }

    /// Read the entries straight from the ledger.
    pub async fn list_addresses(&self) -> Result<AddressListing, IndexError> {
        let state = self.session.query_public_state().await?;
        Ok(AddressListing {
            entries: state.parsed_entries(),
            entry_count: state.entry_count,
            contract_info: ContractInfo::from_state(self.address(), &state),
        })
    }

    /// Address, epoch and owner of the latest snapshot.
    pub fn contract_info(&self) -> Option<ContractInfo> {
        self.session.contract_info()
    }
}
