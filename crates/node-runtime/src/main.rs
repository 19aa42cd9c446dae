//! # Main-Index Node
//!
//! Entry point of the `mi-node` binary.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (defaults, `MI_*` environment, flags)
//! 3. Build providers (locked private state store, reader, ledger, wallet)
//! 4. Wait for a funded wallet, cancellable with Ctrl+C
//! 5. Interactive menu, or with `--server` the HTTP API until Ctrl+C

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use index_telemetry::{init_telemetry, TelemetryConfig};
use node_runtime::{NodeConfig, NodeRuntime, ProviderContainer};
use shared_types::{ContractAddress, IndexError};
use tokio::io::BufReader;
use tracing::{error, info};

/// Main-Index node.
#[derive(Debug, Parser)]
#[command(name = "mi-node", version, about = "Main-Index state sync node")]
struct Cli {
    /// Serve the HTTP API instead of the interactive menu.
    #[arg(long)]
    server: bool,

    /// Main index contract to join instead of deploying one.
    #[arg(long, value_name = "ADDRESS")]
    contract: Option<String>,

    /// Directory of the private state store.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _telemetry = init_telemetry(TelemetryConfig::for_component("node"))
        .context("Failed to initialize telemetry")?;

    let mut config = NodeConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.config_dir {
        config.private_state.dir = dir;
    }
    if let Some(raw) = cli.contract.as_deref() {
        config.main_index = Some(ContractAddress::parse(raw).context("Invalid --contract")?);
    }
    config.validate().context("Invalid configuration")?;

    info!("===========================================");
    info!("  Main-Index Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Mode: {}", if cli.server { "API server" } else { "interactive" });
    info!("===========================================");

    let container = ProviderContainer::new(config).context("Failed to build providers")?;
    let address = container.config.main_index.clone();
    let runtime = Arc::new(NodeRuntime::new(container));

    {
        let runtime = runtime.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C");
                    runtime.shutdown();
                }
                Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
            }
        });
    }

    let result = if cli.server {
        runtime.run_server(address).await
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        runtime.run_cli(stdin, std::io::stdout(), address).await
    };

    match result {
        Err(e) if matches!(e.downcast_ref::<IndexError>(), Some(IndexError::Cancelled)) => {
            info!("Cancelled before the node was ready");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Node stopped with an error");
            Err(e)
        }
        Ok(()) => {
            info!("Node shutdown complete");
            Ok(())
        }
    }
}
