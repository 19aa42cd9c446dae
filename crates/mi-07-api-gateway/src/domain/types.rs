//! Request and response bodies (camelCase on the wire).

use mi_05_contract_session::ContractInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Entry;

/// `POST /addAddress` body. Fields are untyped so that a missing or
/// non-string value is answered with a readable 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddAddressRequest {
    /// Entry title.
    pub title: Option<Value>,
    /// Indexed contract address.
    pub address: Option<Value>,
}

impl AddAddressRequest {
    /// Title, when it is a non-blank string.
    pub fn title(&self) -> Option<&str> {
        non_blank_str(self.title.as_ref())
    }

    /// Address, when it is a non-blank string.
    pub fn address(&self) -> Option<&str> {
        non_blank_str(self.address.as_ref())
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Entry accepted by `/addAddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEntry {
    /// Address with surrounding whitespace removed.
    pub address: String,
    /// Title with surrounding whitespace removed, as stored.
    pub title: String,
    /// Wire form stored by the contract.
    pub entry: String,
}

/// `POST /addAddress` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAddressResponse {
    /// Always `true`.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
    /// The stored entry.
    pub data: AddedEntry,
}

/// `POST /generateNewPageContract` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPageContractResponse {
    /// Always `true`.
    pub success: bool,
    /// Address of the deployed page.
    pub contract_address: String,
    /// Human readable outcome.
    pub message: String,
}

/// Contract summary with the sequence rendered as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfoBody {
    /// Contract address.
    pub address: String,
    /// Epoch, decimal.
    pub sequence: String,
    /// Owner hash, hex.
    pub owner: String,
}

impl From<ContractInfo> for ContractInfoBody {
    fn from(info: ContractInfo) -> Self {
        Self {
            address: info.address.to_string(),
            sequence: info.sequence.to_string(),
            owner: info.owner,
        }
    }
}

/// `POST /returnAllAddresses` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressListResponse {
    /// Always `true`.
    pub success: bool,
    /// Entry count, decimal.
    pub address_count: String,
    /// Entries, oldest first.
    pub addresses: Vec<Entry>,
    /// Contract summary.
    pub contract_info: ContractInfoBody,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: String,
    /// RFC 3339 time of the answer.
    pub timestamp: String,
    /// The wallet passed the funds gate.
    pub wallet_initialized: bool,
    /// Store, reader and submitter are built.
    pub providers_initialized: bool,
    /// A registry is connected.
    pub main_index_connected: bool,
    /// Address of the connected index.
    pub main_index_address: Option<String>,
}

/// Failure body shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureBody {
    /// Always `false`.
    pub success: bool,
    /// What failed.
    pub error: String,
    /// Underlying cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
