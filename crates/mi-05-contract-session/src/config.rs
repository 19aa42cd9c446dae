//! # Session Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::IdentityScope;

/// Contract session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Logical user whose identity the session acts as.
    pub user: String,

    /// How identities are keyed in the private state store.
    pub scope: IdentityScope,

    /// Upper bound on one submission (proof + inclusion).
    pub submission_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: "main-index".to_string(),
            scope: IdentityScope::PerContract,
            submission_timeout: Duration::from_secs(300),
        }
    }
}

impl SessionConfig {
    /// Create a config for testing (short timeout).
    pub fn for_testing() -> Self {
        Self {
            submission_timeout: Duration::from_secs(2),
            ..Self::default()
        }
    }

    /// Same config acting as another user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.scope, IdentityScope::PerContract);
        assert_eq!(config.user, "main-index");
    }

    #[test]
    fn test_with_user() {
        assert_eq!(SessionConfig::for_testing().with_user("bob").user, "bob");
    }
}
