//! # Ports Module
//!
//! The store interface consumed by contract sessions.

use async_trait::async_trait;
use shared_types::{Identity, IndexError};

use crate::domain::PrivateStateKey;

/// Private state store - outbound port of every contract session.
#[async_trait]
pub trait PrivateStateStore: Send + Sync {
    /// Look up the identity stored under `key`.
    async fn get(&self, key: &PrivateStateKey) -> Result<Option<Identity>, IndexError>;

    /// Store `identity` under `key`, overwriting any previous value.
    async fn set(&self, key: &PrivateStateKey, identity: Identity) -> Result<(), IndexError>;

    /// Remove a single identity. Returns whether one was present.
    async fn remove(&self, key: &PrivateStateKey) -> Result<bool, IndexError>;

    /// Remove every identity.
    async fn clear(&self) -> Result<(), IndexError>;

    /// Keys currently stored, in sorted order.
    async fn keys(&self) -> Result<Vec<PrivateStateKey>, IndexError>;
}
