//! # Domain Layer
//!
//! Entry validation and the index contract's rules.

pub mod contract;
pub mod validation;

pub use contract::IndexContract;
pub use validation::{parse_entry, validate_entry};
