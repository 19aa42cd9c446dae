//! # Domain Module
//!
//! Pure readiness rules.

pub mod readiness;
pub mod throttle;

pub use readiness::*;
pub use throttle::*;
