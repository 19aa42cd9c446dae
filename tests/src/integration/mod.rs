//! End-to-end flows through sessions, registry, ledger and wallet.

#[cfg(test)]
mod fixtures;

pub mod collection_flows;
pub mod funds_flows;
pub mod ownership_flows;
pub mod page_flows;
pub mod persistence_flows;
