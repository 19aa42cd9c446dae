//! # Ownership Flows
//!
//! Deploy, initialize and mutate as the owner; reject everyone else; scope
//! ownership to the epoch it was established in.

#[cfg(test)]
mod tests {
    use shared_bus::{EventFilter, EventTopic, IndexEvent};
    use shared_types::{IndexError, ZERO_HASH};

    use crate::integration::fixtures::{settle, TestNetwork};

    #[tokio::test]
    async fn test_deploy_add_then_remove_first() {
        let network = TestNetwork::new();
        let alice = network.participant("alice");

        let registry = alice.deploy().await;
        settle(&registry, |s| s.is_owner).await;

        registry.add_address("deadbeef", "Site1").await.unwrap();
        let state = settle(&registry, |s| s.entry_count == 1).await;
        assert_eq!(state.entries, vec!["deadbeef,Site1".to_string()]);
        assert!(state.is_owner);

        registry.remove_first_address().await.unwrap();
        let state = settle(&registry, |s| s.entry_count == 0).await;
        assert!(state.entries.is_empty());

        let on_ledger = network.ledger.state(registry.address()).unwrap();
        assert!(on_ledger.entries.is_empty());
        assert_eq!(on_ledger.entry_count, 0);
    }

    #[tokio::test]
    async fn test_non_owner_mutation_rejected_state_unchanged() {
        let network = TestNetwork::new();
        let alice = network.participant("alice");
        let bob = network.participant("bob");

        let owned = alice.deploy().await;
        owned.add_address("0xabc", "Alice's").await.unwrap();
        let before = network.ledger.state(owned.address()).unwrap();

        let intruder = bob.join(owned.address()).await;
        let seen = settle(&intruder, |s| s.entry_count == 1).await;
        assert!(!seen.is_owner);

        let err = intruder.add_address("0xdef", "Bob's").await.unwrap_err();
        assert!(matches!(err, IndexError::Authorization(_)));
        assert!(matches!(
            intruder.remove_all_addresses().await,
            Err(IndexError::Authorization(_))
        ));
        assert!(matches!(intruder.clear().await, Err(IndexError::Authorization(_))));
        assert!(matches!(intruder.initialize().await, Err(IndexError::Authorization(_))));

        assert_eq!(network.ledger.state(owned.address()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_clear_scopes_ownership_to_epoch() {
        let network = TestNetwork::new();
        let alice = network.participant("alice");
        let bob = network.participant("bob");

        let registry = alice.deploy().await;
        registry.add_address("deadbeef", "Site1").await.unwrap();
        let owner_before = network.ledger.state(registry.address()).unwrap().owner;

        registry.clear().await.unwrap();
        let state = settle(&registry, |s| s.sequence == 2).await;
        assert!(!state.is_owner);
        assert_eq!(state.entry_count, 0);

        let cleared = network.ledger.state(registry.address()).unwrap();
        assert_eq!(cleared.owner, owner_before);
        assert_ne!(cleared.owner, ZERO_HASH);

        // The old owner no longer passes the owner check.
        assert!(matches!(
            registry.add_address("0xabc", "Late").await,
            Err(IndexError::Authorization(_))
        ));

        // Nobody else may claim the new epoch.
        let other = bob.join(registry.address()).await;
        assert!(matches!(other.initialize().await, Err(IndexError::Authorization(_))));

        // The previous owner may.
        registry.initialize().await.unwrap();
        let state = settle(&registry, |s| s.sequence == 2 && s.is_owner).await;
        assert_eq!(state.entry_count, 0);
        registry.add_address("0xabc", "Fresh").await.unwrap();
    }

    #[tokio::test]
    async fn test_second_initialize_rejected() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;
        assert!(matches!(
            registry.initialize().await,
            Err(IndexError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_observer_follows_owner_changes() {
        let network = TestNetwork::new();
        let owner = network.participant("alice").deploy().await;
        let observer = network.participant("bob").join(owner.address()).await;

        owner.add_address("0x01", "One").await.unwrap();
        owner.add_address("0x02", "Two").await.unwrap();
        let state = settle(&observer, |s| s.entry_count == 2).await;
        assert_eq!(state.entries, vec!["0x01,One".to_string(), "0x02,Two".to_string()]);
        assert!(!state.is_owner);

        owner.clear().await.unwrap();
        let state = settle(&observer, |s| s.sequence == 2).await;
        assert!(state.entries.is_empty());
    }

    #[tokio::test]
    async fn test_transactions_published_on_bus() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;
        let mut events = network.bus.subscribe(
            EventFilter::topics(vec![EventTopic::Transactions]).for_address(registry.address().clone()),
        );

        let (_, receipt) = registry.add_address("deadbeef", "Site1").await.unwrap();
        let event = tokio::time::timeout(crate::integration::fixtures::WAIT, events.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            IndexEvent::TransactionSubmitted {
                circuit,
                transaction_id,
                ..
            } => {
                assert_eq!(circuit, "addAddress");
                assert_eq!(transaction_id, receipt.transaction_id);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
