//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `SecretKey`, `Identity`
//! - **Contract state**: `ContractAddress`, `PublicState`, `DerivedState`, `Entry`
//! - **Transactions**: `IndexOperation`, `TransactionReceipt`, `DeployReceipt`
//! - **Pages**: `PageState`, `BoardState`, `PageOperation`

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::IndexError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// The all-zero owner field of an uninitialized contract.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Width of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// A principal's secret key.
///
/// Never leaves the process except as private prover input. The bytes are
/// wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from a slice, enforcing the key width.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IndexError> {
        let array: [u8; SECRET_KEY_LEN] =
            bytes.try_into().map_err(|_| IndexError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                got: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Parse a hex encoded key, with or without a `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, IndexError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| IndexError::Validation(format!("secret key is not valid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    /// Lowercase hex encoding (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl Serialize for SecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        SecretKey::from_hex(&encoded).map_err(serde::de::Error::custom)
    }
}

/// The private state of one logical principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Secret key identifying the principal.
    pub secret_key: SecretKey,
}

impl Identity {
    /// Create an identity from a secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        Self { secret_key }
    }
}

// =============================================================================
// CLUSTER B: CONTRACT STATE
// =============================================================================

/// Address of a deployed index contract (hex, optional `0x` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAddress(String);

impl ContractAddress {
    /// Parse and validate a contract address.
    pub fn parse(input: &str) -> Result<Self, IndexError> {
        let trimmed = input.trim();
        if !is_hex_token(trimmed) {
            return Err(IndexError::Validation(format!(
                "invalid contract address: {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Address minted from raw bytes, lowercase hex without prefix.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True if `token` is `(0x)?[0-9a-fA-F]+`.
pub fn is_hex_token(token: &str) -> bool {
    let digits = token.strip_prefix("0x").unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Delimiter between address and title in an entry's wire form.
pub const ENTRY_DELIMITER: char = ',';

/// Title reported for entries stored without one.
pub const UNTITLED: &str = "Untitled";

/// An (address, title) entry of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Indexed contract address.
    pub address: String,
    /// Human readable title.
    pub title: String,
}

impl Entry {
    /// Create an entry.
    pub fn new(address: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: title.into(),
        }
    }

    /// Read an entry from its wire form `"address,title"`.
    ///
    /// A missing or empty title reads as [`UNTITLED`].
    pub fn parse(wire: &str) -> Self {
        let (address, title) = match wire.split_once(ENTRY_DELIMITER) {
            Some((address, title)) => (address, title),
            None => (wire, ""),
        };
        let title = if title.is_empty() { UNTITLED } else { title };
        Self::new(address, title)
    }

    /// Wire form `"address,title"`.
    pub fn to_wire(&self) -> String {
        format!("{}{}{}", self.address, ENTRY_DELIMITER, self.title)
    }
}

/// Immutable snapshot of the contract's public (ledger) state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    /// Epoch counter, bumped by every `clear`.
    pub sequence: u64,
    /// Owner hash bound to the epoch it was established in.
    pub owner: Hash,
    /// Entries in wire form, oldest first.
    pub entries: Vec<String>,
    /// Number of entries as counted by the contract.
    pub entry_count: u64,
}

impl PublicState {
    /// State of a freshly deployed contract.
    pub fn initial() -> Self {
        Self {
            sequence: 1,
            owner: ZERO_HASH,
            entries: Vec::new(),
            entry_count: 0,
        }
    }

    /// True while no owner has been established.
    pub fn is_uninitialized(&self) -> bool {
        self.owner == ZERO_HASH
    }

    /// Owner hash as lowercase hex.
    pub fn owner_hex(&self) -> String {
        hex::encode(self.owner)
    }

    /// Entries parsed into (address, title) pairs.
    pub fn parsed_entries(&self) -> Vec<Entry> {
        self.entries.iter().map(|e| Entry::parse(e)).collect()
    }
}

/// Client-local view combining public state with the principal's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Epoch of the underlying snapshot.
    pub sequence: u64,
    /// Entries in wire form, oldest first.
    pub entries: Vec<String>,
    /// Number of entries.
    pub entry_count: u64,
    /// Whether the local principal owns the contract in this epoch.
    pub is_owner: bool,
}

impl DerivedState {
    /// Entries parsed into (address, title) pairs.
    pub fn parsed_entries(&self) -> Vec<Entry> {
        self.entries.iter().map(|e| Entry::parse(e)).collect()
    }
}

// =============================================================================
// CLUSTER C: TRANSACTIONS
// =============================================================================

/// A circuit call against the index contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexOperation {
    /// Establish the caller as owner.
    Initialize,
    /// Append an entry (wire form) at the tail.
    AddAddress {
        /// Entry in wire form.
        entry: String,
    },
    /// Remove the most recently appended entry.
    RemoveFirstAddress,
    /// Remove every entry, keeping the epoch.
    RemoveAllAddresses,
    /// Remove every entry and start a new epoch.
    Clear,
}

impl IndexOperation {
    /// Circuit name as known by the contract.
    pub fn circuit_name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::AddAddress { .. } => "addAddress",
            Self::RemoveFirstAddress => "removeFirstAddress",
            Self::RemoveAllAddresses => "removeAllAddresses",
            Self::Clear => "clear",
        }
    }

    /// True for the owner-gated collection mutations.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Initialize)
    }
}

/// Result of an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Ledger transaction identifier.
    pub transaction_id: String,
    /// Height of the block that included the transaction.
    pub block_height: u64,
}

/// Result of a contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployReceipt {
    /// Address of the new contract.
    pub address: ContractAddress,
    /// Deployment transaction.
    pub receipt: TransactionReceipt,
}

// =============================================================================
// CLUSTER D: PAGES
// =============================================================================

/// Whether a page currently holds a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Nothing posted; anyone may post.
    Vacant,
    /// A post is up; only its poster may change or take it down.
    Occupied,
}

/// Public state of a page contract: one site whose address the index lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Epoch counter, bumped by every take-down.
    pub sequence: u64,
    /// Vacant or occupied.
    pub state: BoardState,
    /// Page content while occupied.
    pub message: Option<String>,
    /// Poster's owner hash, bound to the epoch of the post.
    pub owner: Hash,
    /// Page title.
    pub title: String,
    /// Page description.
    pub description: String,
    /// Whether the page is listed publicly.
    pub is_public: bool,
}

impl PageState {
    /// State of a freshly deployed page.
    pub fn initial() -> Self {
        Self {
            sequence: 1,
            state: BoardState::Vacant,
            message: None,
            owner: ZERO_HASH,
            title: String::new(),
            description: String::new(),
            is_public: true,
        }
    }

    /// Owner hash as lowercase hex.
    pub fn owner_hex(&self) -> String {
        hex::encode(self.owner)
    }
}

/// A circuit call against a page contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOperation {
    /// Occupy a vacant page with `message` and become its owner.
    Post {
        /// Page content.
        message: String,
    },
    /// Vacate the page and start a new epoch.
    TakeDown,
    /// Replace the title.
    UpdateTitle {
        /// New title.
        title: String,
    },
    /// Replace the description.
    UpdateDescription {
        /// New description.
        description: String,
    },
    /// Hide the page from public listings, or list it again.
    SetPrivateWeb {
        /// `true` hides the page.
        private: bool,
    },
}

impl PageOperation {
    /// Circuit name as known by the contract.
    pub fn circuit_name(&self) -> &'static str {
        match self {
            Self::Post { .. } => "post",
            Self::TakeDown => "takeDown",
            Self::UpdateTitle { .. } => "updateTitle",
            Self::UpdateDescription { .. } => "updateDescription",
            Self::SetPrivateWeb { .. } => "setPrivateWeb",
        }
    }
}
