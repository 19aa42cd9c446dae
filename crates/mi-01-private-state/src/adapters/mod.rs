//! # Adapters Module
//!
//! Concrete `PrivateStateStore` implementations.

pub mod file;
pub mod lock;
pub mod memory;

pub use file::FilePrivateStateStore;
pub use lock::{DirectoryLock, LockError};
pub use memory::InMemoryPrivateStateStore;
