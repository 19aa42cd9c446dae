//! # Domain Module
//!
//! Identity scoping and the session's view of the contract.

pub mod identity;
pub mod view;

pub use identity::*;
pub use view::*;
