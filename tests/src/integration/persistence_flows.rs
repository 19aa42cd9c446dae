//! # Persistence Flows
//!
//! Identities kept in the file-backed store across process restarts.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mi_01_private_state::{FilePrivateStateStore, PrivateStateConfig, PrivateStateKey, PrivateStateStore};
    use mi_05_contract_session::IdentityScope;
    use shared_types::{Identity, SecretKey};

    use crate::integration::fixtures::{settle, TestNetwork};

    fn open(dir: &std::path::Path) -> Arc<FilePrivateStateStore> {
        Arc::new(FilePrivateStateStore::open(&PrivateStateConfig::in_dir(dir)).unwrap())
    }

    #[tokio::test]
    async fn test_owner_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let network = TestNetwork::new();

        let address = {
            let registry = network.participant_with_store("alice", open(dir.path())).deploy().await;
            let address = registry.address().clone();
            registry.session().close().await;
            address
        };

        // The first store is dropped with its participant; the lock is free.
        let restarted = network
            .participant_with_store("alice", open(dir.path()))
            .join(&address)
            .await;
        let state = settle(&restarted, |s| s.is_owner).await;
        assert_eq!(state.sequence, 1);
        restarted.add_address("deadbeef", "Site1").await.unwrap();
    }

    #[tokio::test]
    async fn test_other_user_in_same_store_is_not_owner() {
        let dir = tempfile::tempdir().unwrap();
        let network = TestNetwork::new();
        let store = open(dir.path());

        let owned = network.participant_with_store("alice", store.clone()).deploy().await;
        let other = network
            .participant_with_store("bob", store.clone())
            .join(owned.address())
            .await;
        let state = settle(&other, |s| s.sequence == 1).await;
        assert!(!state.is_owner);
        assert_eq!(store.keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_imported_shared_key_used_for_every_contract() {
        let dir = tempfile::tempdir().unwrap();
        let network = TestNetwork::new();
        let store = open(dir.path());
        let imported = Identity::new(SecretKey::from_bytes([9u8; 32]));
        store
            .set(&PrivateStateKey::shared("alice"), imported.clone())
            .await
            .unwrap();

        let alice = network.participant_with_store("alice", store.clone());
        assert_eq!(alice.config.scope, IdentityScope::PerContract);
        let first = alice.deploy().await;
        let second = alice.deploy().await;

        assert_eq!(first.session().identity(), &imported);
        assert_eq!(second.session().identity(), &imported);
        // The fallback does not copy the secret under per-contract keys.
        assert_eq!(store.keys().await.unwrap().len(), 1);
    }
}
