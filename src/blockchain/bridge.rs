//! Wallet bridge seam.
//!
//! The listing flow talks to the chain only through [`WalletBridge`], so a
//! wallet endpoint, a local key, or a test double can stand behind it.

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use async_trait::async_trait;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainCreation, ChainReceipt, PendingCreation,
};

/// Account access, `createProperty` submission and confirmation.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Ask the wallet for account access. May prompt the user; a refusal is
    /// [`BlockchainError::UserRejected`](crate::blockchain::BlockchainError::UserRejected).
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Submit `createProperty(total_shares)` from `account`. Returns as soon
    /// as the transaction hash is known, before confirmation.
    async fn submit_create_property(
        &self,
        account: Address,
        total_shares: u64,
    ) -> BlockchainResult<PendingCreation>;

    /// Wait until the transaction is confirmed. A reverted transaction is an error.
    async fn wait_for_receipt(&self, pending: &PendingCreation) -> BlockchainResult<ChainReceipt>;
}

/// Request access, submit `createProperty(total_shares)` from the first
/// account and wait for confirmation.
///
/// A confirmed transaction whose logs yield no `event_name` is returned with
/// `property_id: None` rather than as an error.
pub async fn create_property_on_chain<W: WalletBridge + ?Sized>(
    bridge: &W,
    interface: &JsonAbi,
    event_name: &str,
    total_shares: u64,
) -> BlockchainResult<ChainCreation> {
    let accounts = bridge.request_accounts().await?;
    let account = accounts.first().copied().ok_or(BlockchainError::NoAccounts)?;

    let pending = bridge.submit_create_property(account, total_shares).await?;
    let receipt = bridge.wait_for_receipt(&pending).await?;
    let creation = receipt.resolve_creation(interface, event_name);

    if creation.property_id.is_none() {
        tracing::warn!(
            tx_hash = %creation.tx_hash,
            event = event_name,
            "Transaction confirmed without a decodable creation event"
        );
    }
    Ok(creation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::contract::{default_interface, PropertyRegistry};
    use alloy::primitives::{Log, TxHash, U256};
    use alloy::sol_types::SolEvent;

    struct StaticWallet {
        accounts: Vec<Address>,
        logs: Vec<Log>,
    }

    #[async_trait]
    impl WalletBridge for StaticWallet {
        async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
            Ok(self.accounts.clone())
        }

        async fn submit_create_property(
            &self,
            account: Address,
            _total_shares: u64,
        ) -> BlockchainResult<PendingCreation> {
            Ok(PendingCreation {
                tx_hash: TxHash::repeat_byte(0x0f),
                account,
            })
        }

        async fn wait_for_receipt(&self, pending: &PendingCreation) -> BlockchainResult<ChainReceipt> {
            Ok(ChainReceipt {
                tx_hash: pending.tx_hash,
                block_number: Some(3),
                logs: self.logs.clone(),
            })
        }
    }

    fn created_log(id: u64) -> Log {
        Log {
            address: Address::repeat_byte(0x22),
            data: PropertyRegistry::PropertyCreated {
                propertyId: U256::from(id),
                owner: Address::repeat_byte(0x11),
                totalShares: U256::from(100),
            }
            .encode_log_data(),
        }
    }

    #[tokio::test]
    async fn test_creation_resolves_identifier() {
        let wallet = StaticWallet {
            accounts: vec![Address::repeat_byte(0x11)],
            logs: vec![created_log(42)],
        };
        let abi = default_interface().unwrap();
        let creation = create_property_on_chain(&wallet, &abi, "PropertyCreated", 100)
            .await
            .unwrap();
        assert_eq!(creation.property_id, Some(U256::from(42)));
        assert_eq!(creation.tx_hash, TxHash::repeat_byte(0x0f));
    }

    #[tokio::test]
    async fn test_confirmed_without_event() {
        let wallet = StaticWallet {
            accounts: vec![Address::repeat_byte(0x11)],
            logs: Vec::new(),
        };
        let abi = default_interface().unwrap();
        let creation = create_property_on_chain(&wallet, &abi, "PropertyCreated", 100)
            .await
            .unwrap();
        assert_eq!(creation.property_id, None);
    }

    #[tokio::test]
    async fn test_no_accounts() {
        let wallet = StaticWallet {
            accounts: Vec::new(),
            logs: Vec::new(),
        };
        let abi = default_interface().unwrap();
        let result = create_property_on_chain(&wallet, &abi, "PropertyCreated", 100).await;
        assert!(matches!(result, Err(BlockchainError::NoAccounts)));
    }
}
