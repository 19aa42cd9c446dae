//! # MI-05 Contract Session
//!
//! Binds one contract address to one identity.
//!
//! **Subsystem ID:** 5
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A session owns one public-state subscription and one private-state
//! lookup. It combines them into a multicast stream of `DerivedState` and
//! exposes the mutating circuit calls of the index contract.
//!
//! ```text
//!  PublicStateReader ──► combinator task ──► watch<SessionView> ──► DerivedStateStream (n)
//!                             ▲                    │
//!  PrivateStateStore ─► Identity (fetched once)    └──► shared bus: DerivedStateChanged
//!
//!  initialize / mutate ──► mutation lock ──► TransactionSubmitter (timeout, detached on expiry)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! mi-05-contract-session/
//! ├── domain/          # IdentityScope, ContractInfo, SessionView
//! ├── ports/           # TransactionSubmitter + MockSubmitter
//! ├── application/     # ContractSession, DerivedStateStream
//! └── config.rs        # SessionConfig
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{resolve_identity, ContractSession, DerivedStateStream, SessionDeps};
pub use config::SessionConfig;
pub use domain::{generate_identity, identity_key, ContractInfo, IdentityScope, SessionView};
pub use ports::{CircuitCall, MockSubmitter, TransactionSubmitter};
