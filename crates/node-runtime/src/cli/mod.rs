//! Interactive menu: pure command parsing plus the line-driven dispatcher.

pub mod commands;
pub mod dispatcher;

pub use commands::{CommandError, MenuCommand, StartCommand};
pub use dispatcher::CommandDispatcher;
