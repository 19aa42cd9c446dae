//! # Index Events
//!
//! Every event that flows through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{ContractAddress, DerivedState, PublicState};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndexEvent {
    // =========================================================================
    // PUBLIC STATE READER
    // =========================================================================
    /// A new public snapshot was delivered for a contract.
    PublicStateObserved {
        /// Contract the snapshot belongs to.
        address: ContractAddress,
        /// The snapshot.
        state: PublicState,
    },

    /// A reader stream ended with a terminal error.
    StreamFailed {
        /// Contract whose stream failed.
        address: ContractAddress,
        /// Error description.
        error: String,
    },

    // =========================================================================
    // CONTRACT SESSION
    // =========================================================================
    /// The derived state of a session changed.
    DerivedStateChanged {
        /// Session contract.
        address: ContractAddress,
        /// New derived state.
        state: DerivedState,
    },

    /// A transaction was accepted by the ledger.
    TransactionSubmitted {
        /// Target contract.
        address: ContractAddress,
        /// Circuit that was called.
        circuit: String,
        /// Ledger transaction id.
        transaction_id: String,
        /// Inclusion height.
        block_height: u64,
    },

    /// A session was closed and unsubscribed.
    SessionClosed {
        /// Session contract.
        address: ContractAddress,
    },
}

impl IndexEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::PublicStateObserved { .. } | Self::StreamFailed { .. } => EventTopic::PublicState,
            Self::DerivedStateChanged { .. } => EventTopic::DerivedState,
            Self::TransactionSubmitted { .. } => EventTopic::Transactions,
            Self::SessionClosed { .. } => EventTopic::Lifecycle,
        }
    }

    /// Contract the event is about.
    #[must_use]
    pub fn address(&self) -> &ContractAddress {
        match self {
            Self::PublicStateObserved { address, .. }
            | Self::StreamFailed { address, .. }
            | Self::DerivedStateChanged { address, .. }
            | Self::TransactionSubmitted { address, .. }
            | Self::SessionClosed { address } => address,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Reader snapshots and failures.
    PublicState,
    /// Derived state updates.
    DerivedState,
    /// Accepted transactions.
    Transactions,
    /// Session open/close.
    Lifecycle,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Contracts to include. Empty means all contracts.
    pub addresses: Vec<ContractAddress>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            addresses: Vec::new(),
        }
    }

    /// Restrict the filter to one contract.
    #[must_use]
    pub fn for_address(mut self, address: ContractAddress) -> Self {
        self.addresses.push(address);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &IndexEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let address_match = self.addresses.is_empty() || self.addresses.contains(event.address());

        topic_match && address_match
    }
}
