//! Client library for a fractional real-estate platform.
//!
//! Talks to the platform's REST backend and, through a wallet bridge, to the
//! property registry contract, keeping the two in step when a property is
//! listed.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod listing;
pub mod observability;
pub mod session;

pub use api::{ApiClient, ApiError, ApiOutcome, ApiResponse};
pub use blockchain::{RpcWallet, WalletBridge};
pub use config::AppConfig;
pub use listing::{ListingFlow, ListingOutcome, ListingState, ListingStore};
pub use session::Session;
