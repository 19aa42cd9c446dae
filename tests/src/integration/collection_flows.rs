//! # Collection Flows
//!
//! The entry list as the owner changes it: append at the tail, remove from
//! the tail, remove everything.

#[cfg(test)]
mod tests {
    use shared_types::{Entry, IndexError, UNTITLED};

    use crate::integration::fixtures::{settle, TestNetwork};

    #[tokio::test]
    async fn test_remove_first_after_two_appends_keeps_first() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;

        registry.add_address("0xaa", "First").await.unwrap();
        registry.add_address("0xbb", "Second").await.unwrap();
        registry.remove_first_address().await.unwrap();

        let state = settle(&registry, |s| s.entry_count == 1).await;
        assert_eq!(state.entries, vec!["0xaa,First".to_string()]);
        assert_eq!(registry.entries(), vec![Entry::new("0xaa", "First")]);
    }

    #[tokio::test]
    async fn test_remove_all_then_remove_first_is_empty_error() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;

        for i in 0..3 {
            registry.add_address(&format!("0x{i}"), "Site").await.unwrap();
        }
        registry.remove_all_addresses().await.unwrap();
        let state = settle(&registry, |s| s.entry_count == 0).await;
        assert_eq!(state.sequence, 1);
        assert!(state.is_owner);

        let err = registry.remove_first_address().await.unwrap_err();
        assert_eq!(err, IndexError::EmptyCollection);
    }

    #[tokio::test]
    async fn test_invalid_entries_never_reach_ledger() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;
        let height = network.ledger.block_height();

        for (address, title) in [("", "x"), ("abc", ""), ("xyz", "Site"), ("abc", "a,b")] {
            assert!(matches!(
                registry.add_address(address, title).await,
                Err(IndexError::Validation(_))
            ));
        }
        assert!(matches!(
            registry.add_entry("no delimiter").await,
            Err(IndexError::Validation(_))
        ));

        assert_eq!(network.ledger.block_height(), height);
    }

    #[tokio::test]
    async fn test_listing_reads_fresh_state() {
        let network = TestNetwork::new();
        let registry = network.participant("alice").deploy().await;
        let (entry, _) = registry.add_entry(" deadbeef , Site1 ").await.unwrap();
        assert_eq!(entry, Entry::new("deadbeef", "Site1"));

        // A fresh read sees the entry even before the subscription catches up.
        let listing = registry.list_addresses().await.unwrap();
        assert_eq!(listing.entry_count, 1);
        assert_eq!(listing.entries, vec![Entry::new("deadbeef", "Site1")]);
        assert_eq!(listing.contract_info.sequence, 1);
        assert_eq!(&listing.contract_info.address, registry.address());
    }

    #[test]
    fn test_untitled_default_on_read() {
        assert_eq!(Entry::parse("0xabc"), Entry::new("0xabc", UNTITLED));
        assert_eq!(Entry::parse("0xabc,"), Entry::new("0xabc", UNTITLED));
    }
}
