//! # Error Types
//!
//! The error taxonomy shared by every subsystem, plus the shapes in which the
//! ledger reports rejected transactions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::ContractAddress;

/// Errors surfaced by the engine.
///
/// `Clone` so that terminal stream errors can be multicast to every
/// subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A secret key did not have the expected width.
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        /// Required width.
        expected: usize,
        /// Supplied width.
        got: usize,
    },

    /// The ledger refused an owner-gated operation.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// `removeFirstAddress` on an empty collection.
    #[error("Cannot remove an entry from an empty collection")]
    EmptyCollection,

    /// An upstream read failed.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// A transaction was rejected or could not be proven/submitted.
    #[error("Transaction submission failed: {0}")]
    Submission(String),

    /// Input rejected locally, before any transaction was attempted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No contract is deployed at the address.
    #[error("No contract found at {0}")]
    NotFound(ContractAddress),

    /// The private state store failed.
    #[error("Private state storage error: {0}")]
    Storage(String),

    /// The operation was cancelled by shutdown.
    #[error("Operation cancelled")]
    Cancelled,
}

impl IndexError {
    /// Only reads may be retried by callers; mutations are never retried blindly.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Stable short name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidKeyLength { .. } => "InvalidKeyLength",
            Self::Authorization(_) => "AuthorizationError",
            Self::EmptyCollection => "EmptyCollectionError",
            Self::Unavailable(_) => "Unavailable",
            Self::Submission(_) => "SubmissionError",
            Self::Validation(_) => "ValidationError",
            Self::NotFound(_) => "NotFound",
            Self::Storage(_) => "StorageError",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Reasons the index contract rejects a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LedgerRejection {
    /// Caller's owner hash does not match the current epoch's owner.
    #[error("failed assert: caller is not the current owner")]
    NotOwner,

    /// `initialize` on a contract whose current epoch already has this owner.
    #[error("failed assert: contract already initialized")]
    AlreadyInitialized,

    /// `removeFirstAddress` on an empty list.
    #[error("failed assert: address list is empty")]
    EmptyCollection,

    /// Entry payload the contract cannot store.
    #[error("failed assert: malformed entry {0:?}")]
    MalformedEntry(String),

    /// `post` on a page that already holds a post.
    #[error("failed assert: Attempted to post to an occupied board")]
    BoardOccupied,

    /// `takeDown` on a page with nothing posted.
    #[error("failed assert: Attempted to take down post from an empty board")]
    BoardVacant,
}

/// Failure reported by the transaction submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The contract rejected the transaction.
    #[error("rejected by ledger: {0}")]
    Rejected(LedgerRejection),

    /// The ledger could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The proof could not be generated.
    #[error("proof generation failed: {0}")]
    Proof(String),

    /// The target contract does not exist.
    #[error("unknown contract {0}")]
    UnknownContract(ContractAddress),
}

impl From<SubmissionFailure> for IndexError {
    fn from(failure: SubmissionFailure) -> Self {
        match failure {
            SubmissionFailure::Rejected(
                reason @ (LedgerRejection::NotOwner | LedgerRejection::AlreadyInitialized),
            ) => IndexError::Authorization(reason.to_string()),
            SubmissionFailure::Rejected(LedgerRejection::EmptyCollection) => {
                IndexError::EmptyCollection
            }
            SubmissionFailure::Rejected(reason @ LedgerRejection::MalformedEntry(_)) => {
                IndexError::Submission(reason.to_string())
            }
            SubmissionFailure::UnknownContract(address) => IndexError::NotFound(address),
            other => IndexError::Submission(other.to_string()),
        }
    }
}
