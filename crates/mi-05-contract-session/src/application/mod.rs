//! # Application Module
//!
//! The contract session and its derived-state stream.

pub mod service;
pub mod stream;

pub use service::{resolve_identity, ContractSession, SessionDeps};
pub use stream::DerivedStateStream;
