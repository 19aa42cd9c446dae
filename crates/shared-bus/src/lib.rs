//! # Shared Bus - Multicast Events Between Subsystems
//!
//! Sessions publish what they observe and what they submit; any number of
//! consumers (CLI, HTTP façade, tests) subscribe independently.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ ContractSession  │                    │ CLI / API / test │
//! │                  │    publish()       │                  │
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! Events carry immutable snapshots, so multicasting them is a clone.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, IndexEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::Subscription;

/// Events buffered for the slowest subscriber before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
