//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the estate client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Remote REST API settings.
    pub api: ApiConfig,

    /// Persisted bearer token location.
    pub session: SessionConfig,

    /// Persisted listing flow location.
    pub listing: ListingConfig,

    /// Wallet and contract settings.
    pub blockchain: BlockchainConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
        }
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path of the JSON file holding the bearer token.
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: ".estate/session.json".to_string(),
        }
    }
}

/// Listing flow storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Path of the JSON file holding in-progress and finished listing flows.
    pub store_path: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            store_path: ".estate/listings.json".to_string(),
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Wallet JSON-RPC endpoint. `None` means no wallet provider is present.
    pub wallet_url: Option<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address of the property registry contract.
    pub contract_address: String,

    /// Number of block confirmations required before reading the receipt.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Optional JSON ABI file; the built-in interface is used when absent.
    pub abi_path: Option<String>,

    /// Event whose first argument carries the on-chain property id.
    pub event_name: String,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            wallet_url: None,
            chain_id: 31337,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            confirmation_blocks: 1,
            poll_interval_ms: 2000,
            abi_path: None,
            event_name: "PropertyCreated".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format: "pretty" for terminals, "json" for log shipping.
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert!(config.blockchain.wallet_url.is_none());
        assert_eq!(config.blockchain.event_name, "PropertyCreated");
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [blockchain]
            wallet_url = "http://127.0.0.1:1248"
            confirmation_blocks = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.blockchain.wallet_url.as_deref(), Some("http://127.0.0.1:1248"));
        assert_eq!(config.blockchain.confirmation_blocks, 3);
        assert_eq!(config.blockchain.poll_interval_ms, 2000);
    }
}
