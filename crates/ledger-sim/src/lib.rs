//! # Ledger Simulator
//!
//! A standalone development network living inside the process.
//!
//! ## Purpose
//!
//! The ledger, the prover and the wallet are external collaborators of the
//! engine. This crate provides one concrete implementation of each port so
//! that the node runs offline and end-to-end behavior can be tested:
//!
//! | Port | Implementation |
//! |------|----------------|
//! | `LedgerQuery` | `SimulatedLedger` (bincode-encoded `PublicState`) |
//! | `TransactionSubmitter` | `SimulatedLedger` (executes `IndexContract`) |
//! | `PageLedger` | `SimulatedLedger` (executes `PageContract`) |
//! | `WalletStateSource` | `SimulatedWallet` |
//!
//! It is not a consensus implementation. Blocks are a counter bumped by each
//! accepted transaction.
//!
//! ## Module Structure
//!
//! ```text
//! ledger-sim/
//! ├── config.rs    # LedgerSimConfig
//! ├── ledger.rs    # SimulatedLedger + fault injection
//! └── wallet.rs    # SimulatedWallet
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod ledger;
pub mod wallet;

pub use config::LedgerSimConfig;
pub use ledger::SimulatedLedger;
pub use wallet::SimulatedWallet;
