//! # Derived State Stream
//!
//! Each consumer gets its own receiver on the session's view cell. A stream
//! yields the current derived state first (if one exists), then every later
//! one; intermediate values may be coalesced. A terminal read error is
//! yielded once and ends the stream.

use futures::stream::{self, BoxStream, StreamExt};
use shared_types::{DerivedState, IndexError};
use tokio::sync::watch;

use crate::domain::SessionView;

/// Independent consumer of a session's derived states.
pub struct DerivedStateStream {
    rx: watch::Receiver<SessionView>,
    seen_version: u64,
    done: bool,
}

impl DerivedStateStream {
    pub(crate) fn new(rx: watch::Receiver<SessionView>) -> Self {
        Self {
            rx,
            seen_version: 0,
            done: false,
        }
    }

    /// Next derived state, a terminal error, or `None` once the stream ended.
    pub async fn next(&mut self) -> Option<Result<DerivedState, IndexError>> {
        loop {
            if self.done {
                return None;
            }

            {
                let view = self.rx.borrow_and_update();
                if view.closed {
                    self.done = true;
                    return None;
                }
                if view.version != self.seen_version {
                    if let Some(derived) = &view.derived {
                        self.seen_version = view.version;
                        return Some(Ok(derived.clone()));
                    }
                }
                if let Some(err) = &view.failure {
                    self.done = true;
                    return Some(Err(err.clone()));
                }
            }

            if self.rx.changed().await.is_err() {
                // Session dropped.
                self.done = true;
                return None;
            }
        }
    }

    /// Adapt into a boxed `Stream`.
    pub fn into_stream(self) -> BoxStream<'static, Result<DerivedState, IndexError>> {
        stream::unfold(self, |mut s| async move { s.next().await.map(|item| (item, s)) }).boxed()
    }
}
