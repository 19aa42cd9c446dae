//! # Outbound Ports
//!
//! The ledger query service, consumed as an opaque "state at address" lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{ContractAddress, IndexError, PublicState};

use crate::domain::encode_state;

/// Ledger query - outbound port.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Raw state blob of the contract at `address`, `None` if no contract
    /// is deployed there.
    async fn query_state(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock ledger for testing.
#[derive(Default)]
pub struct MockLedgerQuery {
    /// Raw states by address.
    pub states: RwLock<HashMap<ContractAddress, Vec<u8>>>,
    /// Should return errors?
    pub should_fail: AtomicBool,
    /// Number of queries served.
    pub queries: AtomicU64,
}

impl MockLedgerQuery {
    /// Create an empty mock ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `state` at `address`.
    pub fn set_state(&self, address: &ContractAddress, state: &PublicState) {
        if let Ok(raw) = encode_state(state) {
            self.states.write().insert(address.clone(), raw);
        }
    }

    /// Publish an arbitrary blob at `address`.
    pub fn set_raw(&self, address: &ContractAddress, raw: Vec<u8>) {
        self.states.write().insert(address.clone(), raw);
    }

    /// Remove the contract at `address`.
    pub fn remove(&self, address: &ContractAddress) {
        self.states.write().remove(address);
    }

    /// Make every following query fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Number of queries served so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerQuery for MockLedgerQuery {
    async fn query_state(&self, address: &ContractAddress) -> Result<Option<Vec<u8>>, IndexError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable("Mock failure".to_string()));
        }
        Ok(self.states.read().get(address).cloned())
    }
}
