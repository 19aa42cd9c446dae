//! # MI-06 Index Registry
//!
//! The ordered (address, title) collection held by the main index contract.
//!
//! **Subsystem ID:** 6
//! **Architecture:** Hexagonal (pure domain + service facade)
//!
//! ## Purpose
//!
//! Specializes a `ContractSession` for the index contract: entries are
//! validated locally before any transaction is spent, then submitted as
//! owner-gated circuit calls. The contract's own rules live here too, as
//! pure functions over `PublicState`, so that any executing ledger applies
//! exactly the state machine clients reason about.
//!
//! ## State Machine
//!
//! | From | Operation | To |
//! |------|-----------|----|
//! | `[]` | `append(e)` | `[e]` |
//! | `[e1..en]` | `append(e)` | `[e1..en, e]` |
//! | `[e1..en]`, n > 0 | `removeFirst` | `[e1..en-1]` |
//! | `[]` | `removeFirst` | `EmptyCollection` |
//! | any | `removeAll` | `[]`, same sequence |
//! | any | `clear` | `[]`, sequence + 1 |
//!
//! ## Module Structure
//!
//! ```text
//! mi-06-index-registry/
//! ├── domain/
//! │   ├── validation.rs   # local entry checks
//! │   └── contract.rs     # IndexContract: owner gate + state machine
//! └── service.rs          # IndexRegistry facade over ContractSession
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod service;

pub use domain::{validate_entry, parse_entry, IndexContract};
pub use service::{AddressListing, IndexRegistry};
