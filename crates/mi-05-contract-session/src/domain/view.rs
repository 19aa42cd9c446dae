//! # Session View
//!
//! The latest values held by a session's combinator.

use serde::{Deserialize, Serialize};
use shared_types::{ContractAddress, DerivedState, IndexError, PublicState};

/// Summary of the contract as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Contract address.
    pub address: ContractAddress,
    /// Current epoch.
    pub sequence: u64,
    /// Owner hash as hex.
    pub owner: String,
}

impl ContractInfo {
    /// Build from a snapshot.
    pub fn from_state(address: &ContractAddress, state: &PublicState) -> Self {
        Self {
            address: address.clone(),
            sequence: state.sequence,
            owner: state.owner_hex(),
        }
    }
}

/// Latest-of-each-input cell shared by the combinator and the streams.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    /// Bumped on every new derived state.
    pub version: u64,
    /// Latest public snapshot.
    pub public: Option<PublicState>,
    /// Latest derived state.
    pub derived: Option<DerivedState>,
    /// Terminal read error, cleared by a resync.
    pub failure: Option<IndexError>,
    /// Set once the session is closed.
    pub closed: bool,
}
