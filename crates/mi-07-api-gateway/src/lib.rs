//! # MI-07 API Gateway
//!
//! Administrative HTTP facade over the main index contract.
//!
//! **Subsystem ID:** 7
//! **Architecture:** Hexagonal (axum adapter over `IndexRegistry`)
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/addAddress` (`/AddAddress`) | Validate and append an (address, title) entry |
//! | POST | `/returnAllAddresses` | Fresh ledger read of every entry |
//! | POST | `/generateNewPageContract` | Deploy a vacant page contract |
//! | GET | `/health` | Readiness of wallet, providers and the index connection |
//!
//! Until a registry is connected the collection routes answer 503. Until the
//! page providers are set, page deployment answers 500.
//!
//! ## Error Mapping
//!
//! | Error | Status |
//! |-------|--------|
//! | Validation | 400 |
//! | Authorization | 403 |
//! | NotFound | 404 |
//! | EmptyCollection | 409 |
//! | Unavailable, Cancelled | 503 |
//! | Submission, Storage, InvalidKeyLength | 500 |
//!
//! ## Module Structure
//!
//! ```text
//! mi-07-api-gateway/
//! ├── domain/
//! │   ├── error.rs     # ApiError, status mapping
//! │   └── types.rs     # request / response bodies
//! ├── extract.rs       # JsonBody extractor with JSON failure bodies
//! ├── handlers.rs      # route handlers
//! ├── service.rs       # ApiGateway: state, router, serve
//! └── config.rs        # ApiConfig
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod extract;
pub mod handlers;
pub mod service;

pub use config::ApiConfig;
pub use domain::{ApiError, GatewayError};
pub use service::{ApiGateway, GatewayState};
