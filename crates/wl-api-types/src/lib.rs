use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_CONTRACT_ADDRESS: &str = "WHITELIST_CONTRACT_ADDRESS";
pub const ENV_CHAIN_ID: &str = "WHITELIST_CHAIN_ID";
pub const ENV_NETWORK_NAME: &str = "WHITELIST_NETWORK_NAME";
pub const ENV_RECEIPT_POLL_MS: &str = "WHITELIST_RECEIPT_POLL_MS";

/// Rinkeby, the network the whitelist contract was deployed to.
pub const DEFAULT_CHAIN_ID: u64 = 4;
pub const DEFAULT_NETWORK_NAME: &str = "Rinkeby";
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;

#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("address must be 0x followed by 40 hex characters, got {0:?}")]
    Format(String),
    #[error("address is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::Format(s.to_owned()))?;
        if digits.len() != 40 {
            return Err(AddressError::Format(s.to_owned()));
        }

        let mut bytes = [0_u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Static configuration of the whitelist front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistConfig {
    pub contract_address: Address,
    #[serde(default = "default_chain_id")]
    pub required_chain_id: u64,
    #[serde(default = "default_network_name")]
    pub network_name: String,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_interval_ms: u64,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_network_name() -> String {
    DEFAULT_NETWORK_NAME.to_owned()
}

fn default_receipt_poll_ms() -> u64 {
    DEFAULT_RECEIPT_POLL_MS
}

impl WhitelistConfig {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            required_chain_id: DEFAULT_CHAIN_ID,
            network_name: default_network_name(),
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_MS,
        }
    }

    /// Reads the `WHITELIST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source keyed by the `WHITELIST_*`
    /// names. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let contract_address = get(ENV_CONTRACT_ADDRESS)
            .ok_or(ConfigError::Missing(ENV_CONTRACT_ADDRESS))?
            .parse::<Address>()
            .map_err(|e| ConfigError::Invalid {
                key: ENV_CONTRACT_ADDRESS,
                reason: e.to_string(),
            })?;

        let mut config = Self::new(contract_address);

        if let Some(raw) = get(ENV_CHAIN_ID) {
            config.required_chain_id = parse_u64(ENV_CHAIN_ID, &raw)?;
        }
        if let Some(name) = get(ENV_NETWORK_NAME) {
            config.network_name = name;
        }
        if let Some(raw) = get(ENV_RECEIPT_POLL_MS) {
            config.receipt_poll_interval_ms = parse_u64(ENV_RECEIPT_POLL_MS, &raw)?;
        }

        Ok(config)
    }

    /// Message shown when the wallet is on the wrong network.
    pub fn network_alert(&self) -> String {
        format!("Please connect to the {} testnet", self.network_name)
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let parsed = match raw.strip_prefix("0x") {
        Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
        None => raw.parse(),
    };
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
