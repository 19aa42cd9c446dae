//! # Public State Reader Service
//!
//! One polling task per subscription. The task queries the ledger, decodes
//! the blob, filters it through a `MonotonicGuard` and forwards what is left.
//! The first upstream failure is forwarded as a terminal `Err` and ends the
//! stream; resubscribing is the caller's decision.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use shared_bus::{EventPublisher, IndexEvent};
use shared_types::{ContractAddress, IndexError, PublicState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::config::ReaderConfig;
use crate::domain::{decode_state, Delivery, MonotonicGuard};
use crate::ports::LedgerQuery;

/// Item type of a state subscription.
pub type StateUpdate = Result<PublicState, IndexError>;

/// Public state reader.
#[derive(Clone)]
pub struct PublicStateReader {
    ledger: Arc<dyn LedgerQuery>,
    config: ReaderConfig,
    bus: Option<Arc<dyn EventPublisher>>,
}

impl PublicStateReader {
    /// Create a reader over `ledger`.
    pub fn new(ledger: Arc<dyn LedgerQuery>, config: ReaderConfig) -> Self {
        Self {
            ledger,
            config,
            bus: None,
        }
    }

    /// Also publish observed snapshots and failures on `bus`.
    pub fn with_bus(mut self, bus: Arc<dyn EventPublisher>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read the current state once.
    ///
    /// `NotFound` when no contract exists at `address`, `Unavailable` when
    /// the ledger cannot be queried.
    pub async fn query_once(&self, address: &ContractAddress) -> Result<PublicState, IndexError> {
        fetch(self.ledger.as_ref(), address).await
    }

    /// Subscribe to the state of `address`.
    ///
    /// The first snapshot is delivered immediately. Dropping the returned
    /// subscription stops the poller.
    pub fn subscribe(&self, address: ContractAddress) -> StateSubscription {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let task = tokio::spawn(run_poller(
            self.ledger.clone(),
            self.bus.clone(),
            address.clone(),
            self.config.clone(),
            tx,
        ));
        info!(address = %address, poll_ms = self.config.poll_interval.as_millis() as u64, "Public state subscription started");
        StateSubscription {
            address,
            inner: ReceiverStream::new(rx),
            task,
        }
    }
}

async fn fetch(ledger: &dyn LedgerQuery, address: &ContractAddress) -> Result<PublicState, IndexError> {
    match ledger.query_state(address).await? {
        Some(raw) => decode_state(&raw),
        None => Err(IndexError::NotFound(address.clone())),
    }
}

async fn run_poller(
    ledger: Arc<dyn LedgerQuery>,
    bus: Option<Arc<dyn EventPublisher>>,
    address: ContractAddress,
    config: ReaderConfig,
    tx: mpsc::Sender<StateUpdate>,
) {
    let mut guard = MonotonicGuard::new();
    let mut ticker = interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tx.closed() => {
                debug!(address = %address, "Subscriber gone, poller stopping");
                return;
            }
            _ = ticker.tick() => {}
        }

        match fetch(ledger.as_ref(), &address).await {
            Ok(state) => match guard.admit(&state) {
                Delivery::Deliver => {
                    debug!(address = %address, sequence = state.sequence, entries = state.entry_count, "New public state");
                    if let Some(bus) = &bus {
                        bus.publish(IndexEvent::PublicStateObserved {
                            address: address.clone(),
                            state: state.clone(),
                        })
                        .await;
                    }
                    if tx.send(Ok(state)).await.is_err() {
                        return;
                    }
                }
                Delivery::Unchanged => {}
                Delivery::Regressed { delivered, observed } => {
                    warn!(
                        address = %address,
                        delivered,
                        observed,
                        "Dropping snapshot with regressed sequence"
                    );
                }
            },
            Err(err) => {
                warn!(address = %address, error = %err, "Public state stream failed");
                if let Some(bus) = &bus {
                    bus.publish(IndexEvent::StreamFailed {
                        address: address.clone(),
                        error: err.to_string(),
                    })
                    .await;
                }
                let _ = tx.send(Err(err)).await;
                return;
            }
        }
    }
}

/// Stream of snapshots for one address.
///
/// Yields `Ok(state)` items, at most one terminal `Err`, then ends.
pub struct StateSubscription {
    address: ContractAddress,
    inner: ReceiverStream<StateUpdate>,
    task: JoinHandle<()>,
}

impl StateSubscription {
    /// Address being observed.
    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// Wait for the next update. `None` once the stream has ended.
    pub async fn next_update(&mut self) -> Option<StateUpdate> {
        self.inner.next().await
    }
}

impl Stream for StateSubscription {
    type Item = StateUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for StateSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockLedgerQuery;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn address() -> ContractAddress {
        ContractAddress::parse("0xfeed").unwrap()
    }

    fn state(sequence: u64, entries: &[&str]) -> PublicState {
        PublicState {
            sequence,
            owner: [3u8; 32],
            entries: entries.iter().map(|e| e.to_string()).collect(),
            entry_count: entries.len() as u64,
        }
    }

    fn reader(ledger: &Arc<MockLedgerQuery>) -> PublicStateReader {
        PublicStateReader::new(ledger.clone(), ReaderConfig::for_testing())
    }

    async fn next(sub: &mut StateSubscription) -> StateUpdate {
        timeout(Duration::from_secs(2), sub.next_update())
            .await
            .expect("timeout")
            .expect("stream ended")
    }

    #[tokio::test]
    async fn test_query_once_not_found() {
        let ledger = Arc::new(MockLedgerQuery::new());
        let result = reader(&ledger).query_once(&address()).await;
        assert_eq!(result, Err(IndexError::NotFound(address())));
    }

    #[tokio::test]
    async fn test_query_once_decodes() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(2, &["aa,Site"]));
        let result = reader(&ledger).query_once(&address()).await.unwrap();
        assert_eq!(result, state(2, &["aa,Site"]));
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_and_changes() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(1, &[]));

        let mut sub = reader(&ledger).subscribe(address());
        assert_eq!(next(&mut sub).await.unwrap(), state(1, &[]));

        ledger.set_state(&address(), &state(1, &["aa,Site"]));
        assert_eq!(next(&mut sub).await.unwrap(), state(1, &["aa,Site"]));
    }

    #[tokio::test]
    async fn test_unchanged_state_not_redelivered() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(1, &[]));

        let mut sub = reader(&ledger).subscribe(address());
        next(&mut sub).await.unwrap();

        let more = timeout(Duration::from_millis(100), sub.next_update()).await;
        assert!(more.is_err(), "no update expected while state is unchanged");
        assert!(ledger.query_count() > 2);
    }

    #[tokio::test]
    async fn test_regressed_sequence_is_dropped() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(2, &[]));

        let mut sub = reader(&ledger).subscribe(address());
        assert_eq!(next(&mut sub).await.unwrap().sequence, 2);

        ledger.set_state(&address(), &state(1, &["old,Stale"]));
        sleep(Duration::from_millis(50)).await;
        ledger.set_state(&address(), &state(3, &[]));

        assert_eq!(next(&mut sub).await.unwrap(), state(3, &[]));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_terminal() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(1, &[]));

        let mut sub = reader(&ledger).subscribe(address());
        next(&mut sub).await.unwrap();

        ledger.set_failing(true);
        assert!(matches!(next(&mut sub).await, Err(IndexError::Unavailable(_))));

        let end = timeout(Duration::from_secs(1), sub.next_update())
            .await
            .expect("timeout");
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn test_missing_contract_is_terminal_not_found() {
        let ledger = Arc::new(MockLedgerQuery::new());
        let mut sub = reader(&ledger).subscribe(address());
        assert_eq!(next(&mut sub).await, Err(IndexError::NotFound(address())));
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(1, &[]));

        let mut sub = reader(&ledger).subscribe(address());
        next(&mut sub).await.unwrap();
        drop(sub);

        sleep(Duration::from_millis(30)).await;
        let count = ledger.query_count();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(ledger.query_count(), count);
    }

    #[tokio::test]
    async fn test_snapshots_published_on_bus() {
        let ledger = Arc::new(MockLedgerQuery::new());
        ledger.set_state(&address(), &state(1, &[]));
        let bus = Arc::new(InMemoryEventBus::new());
        let mut events = bus.subscribe(EventFilter::topics(vec![EventTopic::PublicState]));

        let reader = reader(&ledger).with_bus(bus.clone());
        let _sub = reader.subscribe(address());

        let event = timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(event, IndexEvent::PublicStateObserved { state, .. } if state.sequence == 1));
    }
}
