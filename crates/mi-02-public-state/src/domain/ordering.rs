//! # Monotonic Delivery
//!
//! Consumers must never observe a sequence lower than one already delivered
//! for the same address.

use shared_types::PublicState;

/// What to do with a freshly observed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// New information: deliver it.
    Deliver,
    /// Identical to the last delivered snapshot.
    Unchanged,
    /// Older epoch than already delivered (e.g. a lagging indexer).
    Regressed {
        /// Sequence already delivered.
        delivered: u64,
        /// Sequence just observed.
        observed: u64,
    },
}

/// Tracks the last snapshot delivered on one subscription.
#[derive(Debug, Default)]
pub struct MonotonicGuard {
    last: Option<PublicState>,
}

impl MonotonicGuard {
    /// Create a guard with nothing delivered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `state` and, if it is to be delivered, remember it.
    pub fn admit(&mut self, state: &PublicState) -> Delivery {
        let verdict = match &self.last {
            None => Delivery::Deliver,
            Some(last) if state.sequence < last.sequence => Delivery::Regressed {
                delivered: last.sequence,
                observed: state.sequence,
            },
            Some(last) if last == state => Delivery::Unchanged,
            Some(_) => Delivery::Deliver,
        };
        if verdict == Delivery::Deliver {
            self.last = Some(state.clone());
        }
        verdict
    }

    /// Highest sequence delivered so far.
    pub fn last_sequence(&self) -> Option<u64> {
        self.last.as_ref().map(|s| s.sequence)
    }
}
