//! Blockchain integration subsystem (the wallet bridge).
//!
//! # Data Flow
//! ```text
//! BlockchainConfig (wallet endpoint, contract) + optional private key env
//!     → client.rs (RpcWallet: account access, submission, confirmation)
//!     → bridge.rs (WalletBridge trait seen by the listing flow)
//!     → ChainReceipt
//!     → events.rs (resolve the PropertyCreated id against contract.rs's ABI)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//!
//! A confirmed transaction does not guarantee an identifier: receipts whose
//! logs never decode to the expected event resolve to `None`.

pub mod bridge;
pub mod client;
pub mod contract;
pub mod events;
pub mod types;
pub mod wallet;

pub use bridge::{create_property_on_chain, WalletBridge};
pub use client::RpcWallet;
pub use events::resolve_identifier;
pub use types::{BlockchainError, BlockchainResult, ChainCreation, ChainId, ChainReceipt, PendingCreation};
pub use wallet::Wallet;
