//! # Application Module
//!
//! The reader service and its subscriptions.

pub mod service;

pub use service::{PublicStateReader, StateSubscription};
