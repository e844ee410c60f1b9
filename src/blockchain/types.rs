//! Chain-specific types and error definitions.

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Log, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::events::resolve_identifier;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during wallet and contract operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// No wallet provider is configured.
    #[error("No wallet provider found. Configure a wallet endpoint to create properties on-chain")]
    NoProvider,

    /// The user declined the account or transaction request in their wallet.
    #[error("Request rejected by user: {0}")]
    UserRejected(String),

    /// The wallet granted access but exposed no account.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key or contract address.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The contract interface descriptor could not be loaded.
    #[error("Invalid contract interface: {0}")]
    InvalidAbi(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A submitted, not yet confirmed `createProperty` transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCreation {
    pub tx_hash: TxHash,
    pub account: Address,
}

/// The parts of a confirmed receipt the bridge cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

impl ChainReceipt {
    /// Extract the created property's identifier from the receipt's logs.
    pub fn resolve_creation(&self, interface: &JsonAbi, event_name: &str) -> ChainCreation {
        ChainCreation {
            property_id: resolve_identifier(&self.logs, interface, event_name),
            tx_hash: self.tx_hash,
            block_number: self.block_number,
        }
    }
}

/// Outcome of a confirmed on-chain creation.
///
/// `property_id` is `None` when no log decoded to the expected event: the
/// transaction succeeded but the identifier could not be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainCreation {
    pub property_id: Option<U256>,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}
