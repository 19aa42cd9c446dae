//! # API Gateway Service
//!
//! Owns the shared handler state and serves the router until shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use mi_06_index_registry::IndexRegistry;
use mi_08_page_board::PageDeps;
use parking_lot::RwLock;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiConfig;
use crate::domain::GatewayError;
use crate::handlers::{add_address, generate_new_page_contract, health_check, return_all_addresses};

/// State shared across handlers. Cloning shares it.
#[derive(Clone, Default)]
pub struct GatewayState {
    registry: Arc<RwLock<Option<IndexRegistry>>>,
    pages: Arc<RwLock<Option<PageDeps>>>,
    wallet_ready: Arc<AtomicBool>,
    providers_ready: Arc<AtomicBool>,
}

impl GatewayState {
    /// Connect the main index registry.
    pub fn connect(&self, registry: IndexRegistry) {
        info!(address = %registry.address(), "Main index connected to gateway");
        *self.registry.write() = Some(registry);
    }

    /// Connected registry, if any.
    pub fn registry(&self) -> Option<IndexRegistry> {
        self.registry.read().clone()
    }

    /// Provide what page deployments are built from.
    pub fn set_page_deps(&self, deps: PageDeps) {
        *self.pages.write() = Some(deps);
    }

    /// Page providers, if built.
    pub fn page_deps(&self) -> Option<PageDeps> {
        self.pages.read().clone()
    }

    /// Record that the wallet passed the funds gate.
    pub fn set_wallet_ready(&self, ready: bool) {
        self.wallet_ready.store(ready, Ordering::SeqCst);
    }

    /// Record that the providers are built.
    pub fn set_providers_ready(&self, ready: bool) {
        self.providers_ready.store(ready, Ordering::SeqCst);
    }

    /// Whether the wallet passed the funds gate.
    pub fn wallet_ready(&self) -> bool {
        self.wallet_ready.load(Ordering::SeqCst)
    }

    /// Whether the providers are built.
    pub fn providers_ready(&self) -> bool {
        self.providers_ready.load(Ordering::SeqCst)
    }
}

/// Administrative HTTP server.
pub struct ApiGateway {
    config: ApiConfig,
    state: GatewayState,
}

impl ApiGateway {
    /// Create a gateway with nothing connected yet.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            state: GatewayState::default(),
        }
    }

    /// Handle to the shared state, for wiring the registry later.
    pub fn state(&self) -> GatewayState {
        self.state.clone()
    }

    /// Build the router with CORS and request tracing.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/addAddress", post(add_address))
            .route("/AddAddress", post(add_address))
            .route("/returnAllAddresses", post(return_all_addresses))
            .route("/generateNewPageContract", post(generate_new_page_contract))
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` flips to `true` or its sender is dropped.
    pub async fn serve(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let addr = self.config.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind {
                addr,
                reason: e.to_string(),
            })?;
        let local = listener.local_addr().unwrap_or(addr);
        info!(addr = %local, "Main index API server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
                info!("API server shutting down");
            })
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))
    }
}
