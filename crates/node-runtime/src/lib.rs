//! # Node Runtime Library
//!
//! The internals of the `mi-node` binary, exposed for tests.
//!
//! ## Module Structure
//!
//! ```text
//! container/   configuration and provider construction
//! cli/         menu parsing and the line-driven dispatcher
//! runtime.rs   funds wait, contract selection, server mode
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod container;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, ProviderContainer};
pub use runtime::NodeRuntime;
