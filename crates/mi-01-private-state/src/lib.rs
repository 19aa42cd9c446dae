//! # MI-01 Private State Store
//!
//! Durable key to identity store for secret material.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Holds one `Identity` per logical principal. Keys are either shared by
//! user name or scoped to a contract address, so a process can keep separate
//! secrets per contract while still accepting an operator-imported shared
//! key. One store instance is shared by every session in a process.
//!
//! ## Module Structure
//!
//! ```text
//! mi-01-private-state/
//! ├── domain/          # PrivateStateKey
//! ├── ports/           # PrivateStateStore trait
//! ├── adapters/        # In-memory store, file store, directory lock
//! └── config.rs        # PrivateStateConfig
//! ```
//!
//! ## Concurrency
//!
//! Both adapters guard their map with a reader/writer lock, so `set`,
//! `remove` and `clear` are serialized against concurrent `get`.

#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{DirectoryLock, FilePrivateStateStore, InMemoryPrivateStateStore, LockError};
pub use config::PrivateStateConfig;
pub use domain::PrivateStateKey;
pub use ports::PrivateStateStore;
