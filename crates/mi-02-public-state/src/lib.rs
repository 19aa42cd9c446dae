//! # MI-02 Public State Reader
//!
//! Observes the raw ledger state of index contracts.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Turns "query state at address" into a stream of decoded `PublicState`
//! snapshots per contract address.
//!
//! ## Delivery Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Latest snapshot on each change | one polling task per subscription |
//! | Monotonic sequence | snapshots older than the last delivered are dropped |
//! | No internal retry | the first upstream error ends the stream |
//!
//! ## Module Structure
//!
//! ```text
//! mi-02-public-state/
//! ├── domain/          # bincode state codec, monotonic delivery guard
//! ├── ports/           # LedgerQuery (outbound) + MockLedgerQuery
//! ├── application/     # PublicStateReader, StateSubscription
//! └── config.rs        # ReaderConfig
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{PublicStateReader, StateSubscription};
pub use config::ReaderConfig;
pub use domain::{decode_state, encode_state, Delivery, MonotonicGuard};
pub use ports::{LedgerQuery, MockLedgerQuery};
