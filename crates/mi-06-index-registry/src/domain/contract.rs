//! # Index Contract Rules
//!
//! The contract as executed by a ledger. Every rule is a pure function from
//! the current `PublicState` and the caller's secret (private prover input)
//! to the next state or a rejection. A rejected call leaves the state as it
//! was.
//!
//! Ownership checks run before collection checks, so a non-owner calling
//! `removeFirstAddress` on an empty list is told it is not the owner.

use mi_03_ownership::{derive_owner_hash, owner_matches};
use shared_types::{Hash, IndexOperation, LedgerRejection, PublicState, SecretKey};

/// Rules of the main index contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexContract;

impl IndexContract {
    /// State of a freshly deployed contract.
    pub fn genesis() -> PublicState {
        PublicState::initial()
    }

    /// Execute `operation` as the holder of `secret`.
    pub fn execute(
        state: &PublicState,
        operation: &IndexOperation,
        secret: &SecretKey,
    ) -> Result<PublicState, LedgerRejection> {
        match operation {
            IndexOperation::Initialize => Self::initialize(state, secret),
            IndexOperation::AddAddress { entry } => {
                Self::require_owner(state, secret)?;
                Self::add_address(state, entry)
            }
            IndexOperation::RemoveFirstAddress => {
                Self::require_owner(state, secret)?;
                Self::remove_first_address(state)
            }
            IndexOperation::RemoveAllAddresses => {
                Self::require_owner(state, secret)?;
                Ok(Self::remove_all_addresses(state))
            }
            IndexOperation::Clear => {
                Self::require_owner(state, secret)?;
                Ok(Self::clear(state))
            }
        }
    }

    /// Claim ownership of the current epoch.
    ///
    /// Open on an uninitialized contract, and to the previous epoch's owner
    /// after a `clear`.
    fn initialize(state: &PublicState, secret: &SecretKey) -> Result<PublicState, LedgerRejection> {
        let current = owner_hash(secret, state.sequence)?;
        if owner_matches(&state.owner, &current) {
            return Err(LedgerRejection::AlreadyInitialized);
        }

        let previous_owner = state.sequence > 1
            && owner_matches(&state.owner, &owner_hash(secret, state.sequence - 1)?);
        if !state.is_uninitialized() && !previous_owner {
            return Err(LedgerRejection::NotOwner);
        }

        Ok(PublicState {
            owner: current,
            ..state.clone()
        })
    }

    fn require_owner(state: &PublicState, secret: &SecretKey) -> Result<(), LedgerRejection> {
        if owner_matches(&state.owner, &owner_hash(secret, state.sequence)?) {
            Ok(())
        } else {
            Err(LedgerRejection::NotOwner)
        }
    }

    fn add_address(state: &PublicState, entry: &str) -> Result<PublicState, LedgerRejection> {
        if entry.trim().is_empty() {
            return Err(LedgerRejection::MalformedEntry(entry.to_string()));
        }
        let mut next = state.clone();
        next.entries.push(entry.to_string());
        next.entry_count += 1;
        Ok(next)
    }

    fn remove_first_address(state: &PublicState) -> Result<PublicState, LedgerRejection> {
        if state.entries.is_empty() {
            return Err(LedgerRejection::EmptyCollection);
        }
        let mut next = state.clone();
        next.entries.pop();
        next.entry_count = next.entries.len() as u64;
        Ok(next)
    }

    fn remove_all_addresses(state: &PublicState) -> PublicState {
        PublicState {
            entries: Vec::new(),
            entry_count: 0,
            ..state.clone()
        }
    }

    /// Empty the list and open a new epoch. The owner bytes stay, bound to
    /// the old epoch.
    fn clear(state: &PublicState) -> PublicState {
        PublicState {
            sequence: state.sequence + 1,
            owner: state.owner,
            entries: Vec::new(),
            entry_count: 0,
        }
    }
}

fn owner_hash(secret: &SecretKey, sequence: u64) -> Result<Hash, LedgerRejection> {
    derive_owner_hash(secret.as_bytes(), sequence)
        .map_err(|e| LedgerRejection::MalformedEntry(e.to_string()))
}
