//! # Provider Container
//!
//! Holds the process-wide providers every contract session is built from,
//! with their lifetimes tied to the node.
//!
//! - One private state store, one reader and one submitter per process
//! - The event bus is shared by every session

pub mod config;
pub mod providers;

pub use config::{ConfigError, NodeConfig, GENESIS_MINT_WALLET_SEED};
pub use providers::ProviderContainer;
