//! # Shared Types Crate
//!
//! This crate contains the domain entities and the error taxonomy shared by
//! every Main-Index subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Read-only public state**: `PublicState` is produced by the ledger and is
//!   never mutated by the engine; a new snapshot replaces the old one.
//! - **Secrets stay local**: `SecretKey` redacts itself in `Debug` output and
//!   zeroizes its bytes on drop.

pub mod entities;
pub mod errors;
pub mod wallet;

pub use entities::*;
pub use errors::*;
pub use wallet::*;
