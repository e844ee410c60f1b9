//! Property listing: backend record first, on-chain creation on request.
//!
//! # Data Flow
//! ```text
//! NewProperty
//!     → flow.rs (ListingFlow::submit: PropertyBackend::create_property)
//!     → BackendCreated
//!     → flow.rs (ListingFlow::create_on_chain: WalletBridge submit + confirm)
//!     → event id resolved → PropertyBackend::link_blockchain_id
//!     → ChainConfirmed | Failed { step }
//!     → store.rs (latest state per backend id, persisted as JSON)
//! ```
//!
//! A backend record is never rolled back. When the chain step fails the
//! record stays unlinked and the outcome reports both halves.

pub mod flow;
pub mod state;
pub mod store;

pub use flow::{ChainInterface, ListingError, ListingFlow, PropertyBackend};
pub use state::{FailedStep, ListingOutcome, ListingState};
pub use store::ListingStore;
