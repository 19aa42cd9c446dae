//! # Index Telemetry
//!
//! Structured logging for Main-Index processes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use index_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MI_SERVICE_NAME` | `main-index` | Service name attached to every event |
//! | `MI_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `MI_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `MI_LOG_TARGETS` | `false` | Include module targets in human output |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Install the global `tracing` subscriber.
///
/// The returned guard must be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;
    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
