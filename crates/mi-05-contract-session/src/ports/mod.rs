//! # Ports Module
//!
//! Outbound dependency of the session: transaction submission.

pub mod outbound;

pub use outbound::*;
