//! # Domain Layer
//!
//! Page contract rules, the page state codec and local input checks.

pub mod codec;
pub mod contract;
pub mod validation;

pub use codec::{decode_page, encode_page};
pub use contract::PageContract;
pub use validation::{validate_message, validate_title};
