//! Local signing key.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//!
//! When present, the key signs `createProperty` transactions locally and the
//! wallet endpoint only needs to relay them. Without it, the endpoint itself
//! must hold the account and sign.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ESTATE_WALLET_PRIVATE_KEY";

/// A private key bound to a chain ID.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for EIP-155 replay protection
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Local wallet loaded"
        );

        Ok(Self { signer })
    }

    /// Load the wallet from `ESTATE_WALLET_PRIVATE_KEY`, if set.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Option<Self>> {
        Self::from_lookup(chain_id, |key| std::env::var(key).ok())
    }

    /// Same as [`Wallet::from_env`], reading variables through `lookup`.
    /// A blank value counts as unset.
    pub fn from_lookup<F>(chain_id: u64, lookup: F) -> BlockchainResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(PRIVATE_KEY_ENV_VAR) {
            Some(key) if !key.trim().is_empty() => Self::from_private_key(&key, chain_id).map(Some),
            _ => Ok(None),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.signer.chain_id()
    }

    /// Signing wallet for an alloy provider.
    pub fn into_ethereum_wallet(self) -> EthereumWallet {
        EthereumWallet::from(self.signer)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // First dev account of a local Anvil/Hardhat node.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_dev_key_signs_for_dev_account() {
        let wallet = Wallet::from_private_key(&format!("  {}\n", DEV_KEY), 31337).unwrap();
        assert_eq!(wallet.address(), DEV_ACCOUNT.parse::<Address>().unwrap());
        assert_eq!(wallet.chain_id(), Some(31337));
    }

    #[test]
    fn test_lookup_reads_only_the_key_variable() {
        let wallet = Wallet::from_lookup(31337, |name| {
            (name == PRIVATE_KEY_ENV_VAR).then(|| DEV_KEY.to_string())
        })
        .unwrap()
        .unwrap();
        assert_eq!(wallet.address(), DEV_ACCOUNT.parse::<Address>().unwrap());
    }

    #[test]
    fn test_unset_or_blank_key_means_no_local_wallet() {
        assert!(Wallet::from_lookup(1, |_| None).unwrap().is_none());
        assert!(Wallet::from_lookup(1, |_| Some("   ".to_string())).unwrap().is_none());
    }

    #[test]
    fn test_malformed_key_is_a_wallet_error() {
        let result = Wallet::from_lookup(1, |_| Some("not-a-key".to_string()));
        assert!(matches!(result, Err(BlockchainError::Wallet(_))));
    }

    #[test]
    fn test_debug_shows_account_not_key() {
        let wallet = Wallet::from_private_key(DEV_KEY, 1).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains(&DEV_KEY[2..]));
        assert!(debug.contains("chain_id"));
    }
}
