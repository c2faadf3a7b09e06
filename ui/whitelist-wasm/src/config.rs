//! Page configuration.
//!
//! Each setting comes from a `data-*` attribute on `<body>` when present,
//! otherwise from the matching `WHITELIST_*` variable captured at build time.

use wl_api_types::{
    ConfigError, ENV_CHAIN_ID, ENV_CONTRACT_ADDRESS, ENV_NETWORK_NAME, ENV_RECEIPT_POLL_MS,
    WhitelistConfig,
};

use crate::dom;

pub fn load() -> Result<WhitelistConfig, ConfigError> {
    let body = dom::body();
    WhitelistConfig::from_lookup(|key| {
        let from_page = body
            .as_ref()
            .zip(attribute_name(key))
            .and_then(|(body, attr)| body.get_attribute(attr));
        from_page.or_else(|| build_time(key).map(str::to_owned))
    })
}

fn attribute_name(key: &str) -> Option<&'static str> {
    match key {
        ENV_CONTRACT_ADDRESS => Some("data-contract-address"),
        ENV_CHAIN_ID => Some("data-chain-id"),
        ENV_NETWORK_NAME => Some("data-network-name"),
        ENV_RECEIPT_POLL_MS => Some("data-receipt-poll-ms"),
        _ => None,
    }
}

fn build_time(key: &str) -> Option<&'static str> {
    match key {
        ENV_CONTRACT_ADDRESS => option_env!("WHITELIST_CONTRACT_ADDRESS"),
        ENV_CHAIN_ID => option_env!("WHITELIST_CHAIN_ID"),
        ENV_NETWORK_NAME => option_env!("WHITELIST_NETWORK_NAME"),
        ENV_RECEIPT_POLL_MS => option_env!("WHITELIST_RECEIPT_POLL_MS"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_setting_has_a_page_attribute() {
        for key in [ENV_CONTRACT_ADDRESS, ENV_CHAIN_ID, ENV_NETWORK_NAME, ENV_RECEIPT_POLL_MS] {
            let attr = attribute_name(key).expect("attribute for key");
            assert!(attr.starts_with("data-"));
        }
        assert_eq!(attribute_name("WHITELIST_UNKNOWN"), None);
    }
}
