//! # Domain Module
//!
//! Keys under which identities are stored.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{ContractAddress, IndexError};

/// Separator between contract address and user in a storage key.
pub const KEY_SEPARATOR: char = ':';

/// Stable identifier of a stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrivateStateKey {
    /// Logical user name.
    pub user: String,
    /// Contract the identity is scoped to; `None` for the shared key.
    pub contract: Option<ContractAddress>,
}

impl PrivateStateKey {
    /// Key shared by every contract for `user`.
    pub fn shared(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            contract: None,
        }
    }

    /// Key scoped to one contract.
    pub fn for_contract(address: ContractAddress, user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            contract: Some(address),
        }
    }

    /// Reject keys that could not be read back unambiguously.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.user.is_empty() {
            return Err(IndexError::Validation("user name must not be empty".into()));
        }
        if self.user.contains(KEY_SEPARATOR) {
            return Err(IndexError::Validation(format!(
                "user name must not contain {KEY_SEPARATOR:?}"
            )));
        }
        Ok(())
    }

    /// Flat string form used by on-disk documents.
    pub fn storage_key(&self) -> String {
        match &self.contract {
            Some(address) => format!("{address}{KEY_SEPARATOR}{}", self.user),
            None => self.user.clone(),
        }
    }

    /// Inverse of [`storage_key`](Self::storage_key).
    pub fn from_storage_key(raw: &str) -> Result<Self, IndexError> {
        let key = match raw.split_once(KEY_SEPARATOR) {
            Some((address, user)) => Self::for_contract(ContractAddress::parse(address)?, user),
            None => Self::shared(raw),
        };
        key.validate()?;
        Ok(key)
    }
}

impl fmt::Display for PrivateStateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_forms() {
        let address = ContractAddress::parse("0xabc").unwrap();
        assert_eq!(PrivateStateKey::shared("alice").storage_key(), "alice");
        assert_eq!(
            PrivateStateKey::for_contract(address.clone(), "alice").storage_key(),
            "0xabc:alice"
        );

        let back = PrivateStateKey::from_storage_key("0xabc:alice").unwrap();
        assert_eq!(back.contract, Some(address));
        assert_eq!(back.user, "alice");
    }

    #[test]
    fn test_validate() {
        assert!(PrivateStateKey::shared("").validate().is_err());
        assert!(PrivateStateKey::shared("a:b").validate().is_err());
        assert!(PrivateStateKey::shared("bboard").validate().is_ok());
        assert!(PrivateStateKey::from_storage_key("zz:alice").is_err());
    }
}
