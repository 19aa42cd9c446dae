//! Route handlers.

use axum::extract::State;
use axum::Json;
use mi_08_page_board::PageBoard;
use tracing::{error, info};

use crate::domain::{
    AddAddressRequest, AddAddressResponse, AddedEntry, AddressListResponse, ApiError,
    HealthResponse, NewPageContractResponse,
};
use crate::extract::JsonBody;
use crate::service::GatewayState;

/// `POST /addAddress`: validate and append an entry to the main index.
pub async fn add_address(
    State(state): State<GatewayState>,
    JsonBody(request): JsonBody<AddAddressRequest>,
) -> Result<Json<AddAddressResponse>, ApiError> {
    let registry = state.registry().ok_or_else(ApiError::not_connected)?;

    let title = request
        .title()
        .ok_or_else(|| ApiError::bad_request("Title is required and must be a string"))?;
    let address = request
        .address()
        .ok_or_else(|| ApiError::bad_request("Address is required and must be a string"))?;

    info!(title = %title, address = %address, "API: adding address to main index");

    let (entry, receipt) = registry.add_address(address, title).await.map_err(|e| {
        error!(error = %e, "API: error adding address to main index");
        ApiError::from_index("Failed to add address to main index", e)
    })?;

    info!(
        tx_id = %receipt.transaction_id,
        block_height = receipt.block_height,
        "API: address added to main index"
    );
    Ok(Json(AddAddressResponse {
        success: true,
        message: "Address added to main index successfully".into(),
        data: AddedEntry {
            entry: entry.to_wire(),
            address: entry.address,
            title: entry.title,
        },
    }))
}

/// `POST /returnAllAddresses`: fresh read of every entry.
pub async fn return_all_addresses(
    State(state): State<GatewayState>,
) -> Result<Json<AddressListResponse>, ApiError> {
    let registry = state.registry().ok_or_else(ApiError::not_connected)?;

    let listing = registry.list_addresses().await.map_err(|e| {
        error!(error = %e, "API: error reading main index");
        ApiError::from_index("Failed to get addresses from main index", e)
    })?;

    info!(count = listing.entries.len(), "API: retrieved addresses from main index");
    Ok(Json(AddressListResponse {
        success: true,
        address_count: listing.entry_count.to_string(),
        addresses: listing.entries,
        contract_info: listing.contract_info.into(),
    }))
}

/// `POST /generateNewPageContract`: deploy a vacant page and return its address.
pub async fn generate_new_page_contract(
    State(state): State<GatewayState>,
) -> Result<Json<NewPageContractResponse>, ApiError> {
    let deps = state.page_deps().ok_or_else(ApiError::providers_unavailable)?;

    info!("API: creating new page contract");
    let page = PageBoard::deploy(deps).await.map_err(|e| {
        error!(error = %e, "API: error creating new page contract");
        ApiError::from_index("Failed to create new contract", e)
    })?;

    info!(address = %page.address(), "API: page contract deployed");
    Ok(Json(NewPageContractResponse {
        success: true,
        contract_address: page.address().to_string(),
        message: "New page contract created successfully".into(),
    }))
}

/// `GET /health`.
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let registry = state.registry();
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        wallet_initialized: state.wallet_ready(),
        providers_initialized: state.providers_ready(),
        main_index_connected: registry.is_some(),
        main_index_address: registry.map(|r| r.address().to_string()),
    })
}
