//! # MI-04 Funds Readiness Gate
//!
//! Decides when a wallet has synchronized enough to transact and waits for
//! the first positive native balance.
//!
//! **Subsystem ID:** 4
//!
//! ## Pipeline
//!
//! ```text
//! wallet states ──► throttle (leading edge) ──► sync filter ──► balance > 0 ──► done
//!                   one sample per interval     total - synced   native token
//!                                               < threshold
//! ```
//!
//! The wait is unbounded by design of the wallet; callers bound it with a
//! shutdown signal.
//!
//! ## Module Structure
//!
//! ```text
//! mi-04-funds-gate/
//! ├── domain/          # Throttle, sync admission rule
//! ├── ports/           # WalletStateSource + MockWalletSource
//! ├── service.rs       # FundsReadinessGate
//! └── config.rs        # FundsGateConfig
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::FundsGateConfig;
pub use domain::{remaining_to_sync, sync_admitted, Throttle};
pub use ports::{MockWalletSource, WalletStateSource, WalletStateStream};
pub use service::FundsReadinessGate;
