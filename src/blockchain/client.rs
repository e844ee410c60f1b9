//! Wallet bridge over a JSON-RPC wallet endpoint.
//!
//! # Responsibilities
//! - Request account access (`eth_requestAccounts`) or use the local key
//! - Submit `createProperty` through the registry contract bindings
//! - Poll for the receipt until it has enough confirmations
//! - Map wallet refusals (EIP-1193 code 4001) to `UserRejected`
//!
//! Timeouts are left to the transport and the wallet.

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::interval;

use crate::blockchain::bridge::WalletBridge;
use crate::blockchain::contract::PropertyRegistry;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, ChainReceipt, PendingCreation,
};
use crate::blockchain::wallet::Wallet;
use crate::config::BlockchainConfig;

/// EIP-1193 "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// [`WalletBridge`] backed by an alloy provider.
#[derive(Clone)]
pub struct RpcWallet {
    /// `None` when no wallet endpoint is configured.
    provider: Option<DynProvider>,
    contract: Address,
    /// Set when a local key signs; account access is then implicit.
    local_account: Option<Address>,
    config: BlockchainConfig,
}

impl RpcWallet {
    /// Build the bridge for the configured wallet endpoint.
    ///
    /// A missing endpoint is not an error here: every wallet operation then
    /// fails with [`BlockchainError::NoProvider`], so the caller finds out
    /// when the user actually asks for an on-chain action.
    pub fn connect(config: &BlockchainConfig, wallet: Option<Wallet>) -> BlockchainResult<Self> {
        let contract: Address = config.contract_address.parse().map_err(|e| {
            BlockchainError::Wallet(format!(
                "Invalid contract address '{}': {}",
                config.contract_address, e
            ))
        })?;

        let Some(wallet_url) = &config.wallet_url else {
            tracing::debug!("No wallet endpoint configured");
            return Ok(Self {
                provider: None,
                contract,
                local_account: None,
                config: config.clone(),
            });
        };
        let url: url::Url = wallet_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid wallet URL '{}': {}", wallet_url, e))
        })?;

        let (provider, local_account) = match wallet {
            Some(wallet) => {
                let account = wallet.address();
                let provider = ProviderBuilder::new()
                    .wallet(wallet.into_ethereum_wallet())
                    .connect_http(url)
                    .erased();
                (provider, Some(account))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        tracing::info!(
            wallet_url = %wallet_url,
            contract = %contract,
            chain_id = config.chain_id,
            local_signer = local_account.is_some(),
            "Wallet bridge initialized"
        );

        Ok(Self {
            provider: Some(provider),
            contract,
            local_account,
            config: config.clone(),
        })
    }

    /// Whether a wallet endpoint is configured.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> BlockchainResult<&DynProvider> {
        self.provider.as_ref().ok_or(BlockchainError::NoProvider)
    }

    /// Get the chain ID reported by the wallet.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.provider()?
            .get_chain_id()
            .await
            .map(ChainId)
            .map_err(map_rpc_error)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    fn confirmations(&self, tx_block: u64, current_block: u64) -> u64 {
        // The inclusion block counts as the first confirmation.
        current_block.saturating_sub(tx_block) + 1
    }
}

#[async_trait]
impl WalletBridge for RpcWallet {
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        let provider = self.provider()?;
        if let Some(account) = self.local_account {
            return Ok(vec![account]);
        }

        let accounts: Vec<Address> = provider
            .raw_request("eth_requestAccounts".into(), Vec::<serde_json::Value>::new())
            .await
            .map_err(map_rpc_error)?;

        if accounts.is_empty() {
            return Err(BlockchainError::NoAccounts);
        }
        tracing::info!(account = %accounts[0], "Wallet account access granted");
        Ok(accounts)
    }

    async fn submit_create_property(
        &self,
        account: Address,
        total_shares: u64,
    ) -> BlockchainResult<PendingCreation> {
        self.verify_chain_id().await?;

        let registry = PropertyRegistry::new(self.contract, self.provider()?.clone());
        let pending = registry
            .createProperty(U256::from(total_shares))
            .from(account)
            .send()
            .await
            .map_err(map_contract_error)?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(
            tx_hash = %tx_hash,
            account = %account,
            total_shares = total_shares,
            "createProperty submitted"
        );
        Ok(PendingCreation { tx_hash, account })
    }

    async fn wait_for_receipt(&self, pending: &PendingCreation) -> BlockchainResult<ChainReceipt> {
        let provider = self.provider()?;
        let tx_hash: TxHash = pending.tx_hash;
        let required = u64::from(self.config.confirmation_blocks.max(1));
        let mut ticker = interval(Duration::from_millis(self.config.poll_interval_ms));

        loop {
            ticker.tick().await;

            let receipt = match provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(map_rpc_error)?
            {
                Some(receipt) => receipt,
                None => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
            };

            if !receipt.status() {
                tracing::warn!(tx_hash = %tx_hash, "createProperty reverted");
                return Err(BlockchainError::Reverted(tx_hash.to_string()));
            }

            let current_block = provider.get_block_number().await.map_err(map_rpc_error)?;
            let tx_block = receipt.block_number.unwrap_or(current_block);
            let confirmations = self.confirmations(tx_block, current_block);

            if confirmations >= required {
                tracing::info!(tx_hash = %tx_hash, block_number = tx_block, "createProperty confirmed");
                return Ok(ChainReceipt {
                    tx_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                    logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
                });
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = confirmations,
                required = required,
                "Waiting for confirmations"
            );
        }
    }
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("wallet_url", &self.config.wallet_url)
            .field("contract", &self.contract)
            .field("chain_id", &self.config.chain_id)
            .field("local_account", &self.local_account)
            .finish()
    }
}

/// Map a transport error, recognising wallet refusals.
pub fn map_rpc_error(err: TransportError) -> BlockchainError {
    if let Some(payload) = err.as_error_resp() {
        if payload.code == USER_REJECTED_CODE {
            return BlockchainError::UserRejected(payload.message.to_string());
        }
    }
    BlockchainError::Rpc(err.to_string())
}

fn map_contract_error(err: alloy::contract::Error) -> BlockchainError {
    match err {
        alloy::contract::Error::TransportError(e) => map_rpc_error(e),
        other => BlockchainError::Rpc(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            wallet_url: Some("http://localhost:8545".to_string()),
            ..BlockchainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_no_provider() {
        let bridge = RpcWallet::connect(&BlockchainConfig::default(), None).unwrap();
        assert!(!bridge.is_available());
        assert!(matches!(
            bridge.request_accounts().await,
            Err(BlockchainError::NoProvider)
        ));
        assert!(matches!(
            bridge.submit_create_property(Address::ZERO, 100).await,
            Err(BlockchainError::NoProvider)
        ));
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut config = test_config();
        config.contract_address = "0xnope".to_string();
        let result = RpcWallet::connect(&config, None);
        assert!(matches!(result, Err(BlockchainError::Wallet(_))));
    }

    #[tokio::test]
    async fn test_local_key_grants_access_without_prompt() {
        let wallet = Wallet::from_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            31337,
        )
        .unwrap();
        let expected = wallet.address();
        let bridge = RpcWallet::connect(&test_config(), Some(wallet)).unwrap();
        assert_eq!(bridge.request_accounts().await.unwrap(), vec![expected]);
    }

    #[test]
    fn test_confirmation_count() {
        let bridge = RpcWallet::connect(&test_config(), None).unwrap();
        assert_eq!(bridge.confirmations(100, 100), 1);
        assert_eq!(bridge.confirmations(100, 102), 3);
        assert_eq!(bridge.confirmations(105, 100), 1);
    }

    #[test]
    fn test_user_rejection_mapping() {
        let payload: alloy::rpc::json_rpc::ErrorPayload = serde_json::from_value(serde_json::json!({
            "code": 4001,
            "message": "User rejected the request."
        }))
        .unwrap();
        let err = map_rpc_error(TransportError::ErrorResp(payload));
        assert!(matches!(err, BlockchainError::UserRejected(ref m) if m == "User rejected the request."));

        let payload: alloy::rpc::json_rpc::ErrorPayload = serde_json::from_value(serde_json::json!({
            "code": -32000,
            "message": "insufficient funds"
        }))
        .unwrap();
        assert!(matches!(
            map_rpc_error(TransportError::ErrorResp(payload)),
            BlockchainError::Rpc(_)
        ));
    }
}
