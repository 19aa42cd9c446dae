//! # Page Flows
//!
//! A page is deployed, claimed by its first poster and listed in the main
//! index. Only the poster edits it; after a take-down anyone may post.

#[cfg(test)]
mod tests {
    use shared_types::{BoardState, IndexError};

    use crate::integration::fixtures::{settle, TestNetwork};

    #[tokio::test]
    async fn test_page_listed_in_main_index() {
        let network = TestNetwork::new();
        let alice = network.participant("alice");

        let index = alice.deploy().await;
        let page = alice.deploy_page(&network).await;
        page.post("<h1>Alice's site</h1>").await.unwrap();
        page.update_title("Alice").await.unwrap();

        let title = page.state().await.unwrap().title;
        index
            .add_address(page.address().as_str(), &title)
            .await
            .unwrap();
        let state = settle(&index, |s| s.entry_count == 1).await;
        assert_eq!(state.entries, vec![format!("{},Alice", page.address())]);
    }

    #[tokio::test]
    async fn test_page_ownership_changes_hands() {
        let network = TestNetwork::new();
        let alice = network.participant("alice");
        let bob = network.participant("bob");

        let mine = alice.deploy_page(&network).await;
        mine.post("first").await.unwrap();

        let theirs = bob.open_page(&network, mine.address()).await;
        assert!(matches!(
            theirs.update_description("defaced").await,
            Err(IndexError::Authorization(_))
        ));
        assert!(matches!(theirs.post("second").await, Err(IndexError::Submission(_))));

        mine.take_down().await.unwrap();
        theirs.post("second").await.unwrap();

        let page = network.ledger.page(mine.address()).unwrap();
        assert_eq!(page.state, BoardState::Occupied);
        assert_eq!(page.sequence, 2);
        assert_eq!(page.message.as_deref(), Some("second"));
        assert!(theirs.is_owner().await.unwrap());
        assert!(!mine.is_owner().await.unwrap());
        assert!(matches!(mine.take_down().await, Err(IndexError::Authorization(_))));
    }
}
