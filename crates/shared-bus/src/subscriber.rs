//! # Subscriptions
//!
//! A receiver plus its filter. Events a slow subscriber missed are skipped,
//! never replayed: every event carries a full snapshot, so the next one
//! supersedes what was lost.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use crate::events::{EventFilter, IndexEvent};

/// Filtered view of the bus for one consumer.
pub struct Subscription {
    receiver: broadcast::Receiver<IndexEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<IndexEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next matching event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<IndexEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Bus subscriber fell behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The filter applied to incoming events.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use crate::publisher::{EventPublisher, InMemoryEventBus};
    use shared_types::{ContractAddress, DerivedState};
    use std::time::Duration;
    use tokio::time::timeout;

    fn address(raw: &str) -> ContractAddress {
        ContractAddress::parse(raw).unwrap()
    }

    fn derived_changed(raw: &str, sequence: u64) -> IndexEvent {
        IndexEvent::DerivedStateChanged {
            address: address(raw),
            state: DerivedState {
                sequence,
                entries: vec![],
                entry_count: 0,
                is_owner: false,
            },
        }
    }

    #[tokio::test]
    async fn test_topic_and_address_filtering() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(
            EventFilter::topics(vec![EventTopic::DerivedState]).for_address(address("0xabc")),
        );

        bus.publish(IndexEvent::SessionClosed { address: address("0xabc") }).await;
        bus.publish(derived_changed("0xdef", 1)).await;
        bus.publish(derived_changed("0xabc", 2)).await;

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .unwrap()
            .unwrap();
        match received {
            IndexEvent::DerivedStateChanged { address: a, state } => {
                assert_eq!(a, address("0xabc"));
                assert_eq!(state.sequence, 2);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lagged_subscriber_skips_to_latest() {
        let bus = InMemoryEventBus::with_capacity(2);
        let mut sub = bus.subscribe(EventFilter::all());

        for sequence in 1..=5 {
            bus.publish(derived_changed("0xabc", sequence)).await;
        }

        let first = sub.recv().await.unwrap();
        assert!(matches!(
            first,
            IndexEvent::DerivedStateChanged { ref state, .. } if state.sequence == 4
        ));
    }

    #[tokio::test]
    async fn test_recv_ends_with_bus() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        assert!(sub.filter().topics.is_empty());
        drop(bus);
        assert!(sub.recv().await.is_none());
    }
}
