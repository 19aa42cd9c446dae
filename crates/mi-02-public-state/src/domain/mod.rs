//! # Domain Module
//!
//! Raw state decoding and delivery ordering.

pub mod codec;
pub mod ordering;

pub use codec::*;
pub use ordering::*;
