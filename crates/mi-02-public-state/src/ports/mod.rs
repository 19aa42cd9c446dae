//! # Ports Module
//!
//! Outbound dependency of the reader: the ledger query service.

pub mod outbound;

pub use outbound::*;
