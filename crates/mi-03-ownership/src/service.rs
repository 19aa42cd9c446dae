//! # Ownership Deriver Service
//!
//! Combines a public snapshot with the local identity into a `DerivedState`.

use shared_types::{DerivedState, Hash, Identity, IndexError, PublicState};
use tracing::trace;

use crate::domain::{derive_owner_hash, owner_matches};

/// Stateless deriver. Cheap to copy; instances are interchangeable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipDeriver;

impl OwnershipDeriver {
    /// Create a deriver.
    pub fn new() -> Self {
        Self
    }

    /// Expected owner hash for `secret` in epoch `sequence`.
    pub fn derive(&self, secret: &[u8], sequence: u64) -> Result<Hash, IndexError> {
        derive_owner_hash(secret, sequence)
    }

    /// Whether `identity` owns the contract in the snapshot's epoch.
    pub fn is_owner(&self, state: &PublicState, identity: &Identity) -> Result<bool, IndexError> {
        let expected = self.derive(identity.secret_key.as_bytes(), state.sequence)?;
        Ok(owner_matches(&state.owner, &expected))
    }

    /// Build the derived view of `state` for `identity`.
    pub fn derive_state(
        &self,
        state: &PublicState,
        identity: &Identity,
    ) -> Result<DerivedState, IndexError> {
        let is_owner = self.is_owner(state, identity)?;
        trace!(sequence = state.sequence, is_owner, "Derived state computed");
        Ok(DerivedState {
            sequence: state.sequence,
            entries: state.entries.clone(),
            entry_count: state.entry_count,
            is_owner,
        })
    }
}
