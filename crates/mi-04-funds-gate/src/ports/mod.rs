//! # Ports Module
//!
//! The wallet-state source observed by the gate.

use futures::stream::BoxStream;
use shared_types::WalletState;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream of wallet samples.
pub type WalletStateStream = BoxStream<'static, WalletState>;

/// Wallet state source - outbound port.
pub trait WalletStateSource: Send + Sync {
    /// Latest known sample, if any.
    fn current(&self) -> Option<WalletState>;

    /// Samples observed from now on.
    fn subscribe(&self) -> WalletStateStream;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock wallet that forwards pushed samples in order.
pub struct MockWalletSource {
    sender: broadcast::Sender<WalletState>,
    current: parking_lot::Mutex<Option<WalletState>>,
}

impl Default for MockWalletSource {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            sender,
            current: parking_lot::Mutex::new(None),
        }
    }
}

impl MockWalletSource {
    /// Create a wallet with no samples yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a wallet whose current sample is `state`.
    pub fn with_current(state: WalletState) -> Self {
        let source = Self::default();
        *source.current.lock() = Some(state);
        source
    }

    /// Emit a sample to subscribers and make it current.
    pub fn push(&self, state: WalletState) {
        *self.current.lock() = Some(state.clone());
        let _ = self.sender.send(state);
    }
}

impl WalletStateSource for MockWalletSource {
    fn current(&self) -> Option<WalletState> {
        self.current.lock().clone()
    }

    fn subscribe(&self) -> WalletStateStream {
        Box::pin(BroadcastStream::new(self.sender.subscribe()).filter_map(|item| item.ok()))
    }
}
