//! # Identity Scoping
//!
//! `PerContract` keeps one secret per (contract, user) so that a leaked
//! secret compromises a single contract. A key imported by the operator
//! under the shared user name is still honoured as a fallback. `Shared`
//! uses one secret per user for every contract.

use mi_01_private_state::PrivateStateKey;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use shared_types::{ContractAddress, Identity, SecretKey, SECRET_KEY_LEN};

/// How identities are keyed in the private state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityScope {
    /// One identity per (contract, user).
    #[default]
    PerContract,
    /// One identity per user.
    Shared,
}

impl IdentityScope {
    /// Parse `per-contract` or `shared`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "per-contract" | "per_contract" | "contract" => Some(Self::PerContract),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }
}

/// Primary storage key of the identity for `address` under `scope`.
pub fn identity_key(scope: IdentityScope, user: &str, address: &ContractAddress) -> PrivateStateKey {
    match scope {
        IdentityScope::PerContract => PrivateStateKey::for_contract(address.clone(), user),
        IdentityScope::Shared => PrivateStateKey::shared(user),
    }
}

/// Keys to try, in order, when resolving an existing identity.
pub fn lookup_order(scope: IdentityScope, user: &str, address: &ContractAddress) -> Vec<PrivateStateKey> {
    match scope {
        IdentityScope::PerContract => vec![
            PrivateStateKey::for_contract(address.clone(), user),
            PrivateStateKey::shared(user),
        ],
        IdentityScope::Shared => vec![PrivateStateKey::shared(user)],
    }
}

/// Fresh identity from 32 random bytes.
pub fn generate_identity() -> Identity {
    let mut bytes = [0u8; SECRET_KEY_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    Identity::new(SecretKey::from_bytes(bytes))
}
