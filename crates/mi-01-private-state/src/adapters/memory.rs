//! In-memory store, used by tests and by processes that need no persistence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Identity, IndexError};
use tracing::debug;

use crate::domain::PrivateStateKey;
use crate::ports::PrivateStateStore;

/// Process-local identity map.
#[derive(Debug, Default)]
pub struct InMemoryPrivateStateStore {
    identities: RwLock<BTreeMap<PrivateStateKey, Identity>>,
}

impl InMemoryPrivateStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

#[async_trait]
impl PrivateStateStore for InMemoryPrivateStateStore {
    async fn get(&self, key: &PrivateStateKey) -> Result<Option<Identity>, IndexError> {
        Ok(self.identities.read().get(key).cloned())
    }

    async fn set(&self, key: &PrivateStateKey, identity: Identity) -> Result<(), IndexError> {
        key.validate()?;
        self.identities.write().insert(key.clone(), identity);
        debug!(key = %key, "Identity stored");
        Ok(())
    }

    async fn remove(&self, key: &PrivateStateKey) -> Result<bool, IndexError> {
        Ok(self.identities.write().remove(key).is_some())
    }

    async fn clear(&self) -> Result<(), IndexError> {
        self.identities.write().clear();
        debug!("All identities cleared");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<PrivateStateKey>, IndexError> {
        Ok(self.identities.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SecretKey;

    fn identity(byte: u8) -> Identity {
        Identity::new(SecretKey::from_bytes([byte; 32]))
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryPrivateStateStore::new();
        let key = PrivateStateKey::shared("bboard");

        store.set(&key, identity(1)).await.unwrap();
        store.set(&key, identity(2)).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some(identity(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryPrivateStateStore::new();
        assert_eq!(store.get(&PrivateStateKey::shared("nobody")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = InMemoryPrivateStateStore::new();
        let a = PrivateStateKey::shared("a");
        let b = PrivateStateKey::shared("b");
        store.set(&a, identity(1)).await.unwrap();
        store.set(&b, identity(2)).await.unwrap();

        assert!(store.remove(&a).await.unwrap());
        assert!(!store.remove(&a).await.unwrap());
        assert_eq!(store.keys().await.unwrap(), vec![b]);

        store.clear().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_rejects_invalid_key() {
        let store = InMemoryPrivateStateStore::new();
        let result = store.set(&PrivateStateKey::shared(""), identity(1)).await;
        assert!(matches!(result, Err(IndexError::Validation(_))));
    }
}
