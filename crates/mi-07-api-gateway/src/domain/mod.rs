//! # Domain Layer
//!
//! Error mapping and wire bodies of the HTTP facade.

pub mod error;
pub mod types;

pub use error::{ApiError, GatewayError};
pub use types::*;
