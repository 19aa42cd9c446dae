//! # Node Configuration
//!
//! Defaults for every section, overridden from `MI_*` environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MI_POLL_INTERVAL_MS` | `ledger.poll_interval_ms` |
//! | `MI_BLOCK_TIME_MS` | `ledger.block_time_ms` |
//! | `MI_ADDRESS_SEED` | `ledger.address_seed` |
//! | `MI_PRIVATE_STATE_DIR` | `private_state.dir` |
//! | `MI_USER` | `private_state.user` |
//! | `MI_IDENTITY_SCOPE` | `private_state.scope` |
//! | `MI_FUNDS_SAMPLE_SECS` | `funds.sample_interval_secs` |
//! | `MI_SYNC_THRESHOLD` | `funds.sync_threshold` |
//! | `MI_SUBMISSION_TIMEOUT_SECS` | `session.submission_timeout_secs` |
//! | `MI_API_BIND` | `api.bind_addr` |
//! | `MI_API_PORT` | `api.port` |
//! | `MI_WALLET_SEED` | `wallet.seed` |
//! | `MI_MAIN_INDEX_ADDRESS` | `main_index` |

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ledger_sim::LedgerSimConfig;
use mi_02_public_state::ReaderConfig;
use mi_04_funds_gate::FundsGateConfig;
use mi_05_contract_session::{IdentityScope, SessionConfig};
use mi_07_api_gateway::ApiConfig;
use shared_types::ContractAddress;
use thiserror::Error;

/// Seed of the wallet holding the tokens minted at genesis of a standalone
/// network.
pub const GENESIS_MINT_WALLET_SEED: &str =
    "0000000000000000000000000000000000000000000000000000000000000001";

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Ledger access.
    pub ledger: LedgerConfig,
    /// Identity storage.
    pub private_state: PrivateStateSection,
    /// Funds readiness.
    pub funds: FundsConfig,
    /// Contract sessions.
    pub session: SessionSection,
    /// HTTP facade.
    pub api: ApiSection,
    /// Wallet.
    pub wallet: WalletConfig,
    /// Main index contract joined in server mode; deployed when absent.
    pub main_index: Option<ContractAddress>,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Poll interval of zero would spin on the ledger.
    #[error("ledger.poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    /// A zero threshold can never be met.
    #[error("funds.sync_threshold must be greater than zero")]
    ZeroSyncThreshold,

    /// Empty logical user.
    #[error("private_state.user must not be empty")]
    EmptyUser,

    /// An environment variable could not be parsed.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable name.
        var: String,
        /// Raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },
}

/// Ledger access.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Interval between state queries of one subscription.
    pub poll_interval_ms: u64,
    /// Latency of each simulated block.
    pub block_time_ms: u64,
    /// Seed for contract addresses minted by the standalone ledger.
    pub address_seed: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            block_time_ms: 500,
            address_seed: None,
        }
    }
}

/// Identity storage.
#[derive(Debug, Clone)]
pub struct PrivateStateSection {
    /// Directory of the identity document.
    pub dir: PathBuf,
    /// Logical user the node acts as.
    pub user: String,
    /// Identity keying.
    pub scope: IdentityScope,
}

impl Default for PrivateStateSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".main-index/private-state"),
            user: "main-index".to_string(),
            scope: IdentityScope::PerContract,
        }
    }
}

/// Funds readiness.
#[derive(Debug, Clone)]
pub struct FundsConfig {
    /// Minimum seconds between admitted wallet samples.
    pub sample_interval_secs: u64,
    /// Remaining sync work below which the wallet is ready.
    pub sync_threshold: u64,
}

impl Default for FundsConfig {
    fn default() -> Self {
        let gate = FundsGateConfig::default();
        Self {
            sample_interval_secs: gate.sample_interval.as_secs(),
            sync_threshold: gate.sync_threshold,
        }
    }
}

/// Contract sessions.
#[derive(Debug, Clone)]
pub struct SessionSection {
    /// Upper bound on one submission.
    pub submission_timeout_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            submission_timeout_secs: 300,
        }
    }
}

/// HTTP facade.
#[derive(Debug, Clone)]
pub struct ApiSection {
    /// Interface to bind.
    pub bind_addr: IpAddr,
    /// TCP port.
    pub port: u16,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
        }
    }
}

/// Wallet.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Wallet seed; the genesis mint seed when absent.
    pub seed: Option<String>,
    /// Native tokens minted to the genesis wallet.
    pub genesis_balance: u128,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            seed: None,
            genesis_balance: LedgerSimConfig::default().genesis_balance,
        }
    }
}

impl WalletConfig {
    /// Whether this wallet holds the genesis mint.
    pub fn is_genesis(&self) -> bool {
        self.seed
            .as_deref()
            .map_or(true, |seed| seed.trim_start_matches("0x") == GENESIS_MINT_WALLET_SEED)
    }
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        override_parsed(&lookup, "MI_POLL_INTERVAL_MS", &mut config.ledger.poll_interval_ms)?;
        override_parsed(&lookup, "MI_BLOCK_TIME_MS", &mut config.ledger.block_time_ms)?;
        if let Some(seed) = parsed::<u64>(&lookup, "MI_ADDRESS_SEED")? {
            config.ledger.address_seed = Some(seed);
        }

        if let Some(dir) = lookup("MI_PRIVATE_STATE_DIR") {
            config.private_state.dir = PathBuf::from(dir);
        }
        if let Some(user) = lookup("MI_USER") {
            config.private_state.user = user;
        }
        if let Some(raw) = lookup("MI_IDENTITY_SCOPE") {
            config.private_state.scope =
                IdentityScope::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    var: "MI_IDENTITY_SCOPE".into(),
                    value: raw.clone(),
                    reason: "expected per-contract or shared".into(),
                })?;
        }

        override_parsed(&lookup, "MI_FUNDS_SAMPLE_SECS", &mut config.funds.sample_interval_secs)?;
        override_parsed(&lookup, "MI_SYNC_THRESHOLD", &mut config.funds.sync_threshold)?;
        override_parsed(
            &lookup,
            "MI_SUBMISSION_TIMEOUT_SECS",
            &mut config.session.submission_timeout_secs,
        )?;
        override_parsed(&lookup, "MI_API_BIND", &mut config.api.bind_addr)?;
        override_parsed(&lookup, "MI_API_PORT", &mut config.api.port)?;

        if let Some(seed) = lookup("MI_WALLET_SEED") {
            config.wallet.seed = Some(seed);
        }
        if let Some(raw) = lookup("MI_MAIN_INDEX_ADDRESS") {
            config.main_index =
                Some(ContractAddress::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                    var: "MI_MAIN_INDEX_ADDRESS".into(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?);
        }

        Ok(config)
    }

    /// Fast settings for tests: instant blocks, tight polling, ephemeral port.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.ledger.poll_interval_ms = 10;
        config.ledger.block_time_ms = 0;
        config.ledger.address_seed = Some(7);
        config.funds.sample_interval_secs = 0;
        config.session.submission_timeout_secs = 5;
        config.api.bind_addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.api.port = 0;
        config
    }

    /// Reject settings the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.funds.sync_threshold == 0 {
            return Err(ConfigError::ZeroSyncThreshold);
        }
        if self.private_state.user.trim().is_empty() {
            return Err(ConfigError::EmptyUser);
        }
        Ok(())
    }

    /// Reader settings.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            poll_interval: Duration::from_millis(self.ledger.poll_interval_ms),
            ..ReaderConfig::default()
        }
    }

    /// Funds gate settings.
    pub fn funds_gate_config(&self) -> FundsGateConfig {
        FundsGateConfig {
            sample_interval: Duration::from_secs(self.funds.sample_interval_secs),
            sync_threshold: self.funds.sync_threshold,
            ..FundsGateConfig::default()
        }
    }

    /// Session settings.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            user: self.private_state.user.clone(),
            scope: self.private_state.scope,
            submission_timeout: Duration::from_secs(self.session.submission_timeout_secs),
        }
    }

    /// Standalone ledger settings.
    pub fn ledger_sim_config(&self) -> LedgerSimConfig {
        LedgerSimConfig {
            block_time: Duration::from_millis(self.ledger.block_time_ms),
            address_seed: self.ledger.address_seed,
            genesis_balance: self.wallet.genesis_balance,
        }
    }

    /// HTTP facade settings.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            bind_addr: self.api.bind_addr,
            port: self.api.port,
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn override_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    field: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = parsed(lookup, var)? {
        *field = value;
    }
    Ok(())
}
