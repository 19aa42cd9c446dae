//! # Domain Module
//!
//! The owner hash binding.

pub mod binding;

pub use binding::*;
