//! # MI-03 Ownership Deriver
//!
//! Computes the "is the local principal the current owner" fact.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (pure domain + service facade)
//!
//! ## Purpose
//!
//! The contract stores an owner hash that binds a secret key to the epoch
//! (`sequence`) in which ownership was established. Clients re-derive the
//! hash locally from their private identity and compare it against the
//! public snapshot. Because the sequence is part of the preimage, a `clear`
//! that bumps the sequence revokes ownership without touching the stored
//! owner bytes.
//!
//! ## Module Structure
//!
//! ```text
//! mi-03-ownership/
//! ├── domain/          # derive_owner_hash, owner_matches
//! └── service.rs       # OwnershipDeriver: PublicState + Identity -> DerivedState
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod service;

pub use domain::{derive_owner_hash, owner_matches, OWNER_DOMAIN_TAG};
pub use service::OwnershipDeriver;
