//! Backend client for the platform REST API.
//!
//! # Data Flow
//! ```text
//! caller
//!     → users.rs / properties.rs / transactions.rs (typed endpoints)
//!     → client.rs (bearer token from Session, JSON encode/decode)
//!     → ApiResponse<T> = Result<T, ApiError>
//! ```
//!
//! Every failure is an [`ApiError`] with a message and a status; status 0
//! means no usable response was received.

pub mod client;
pub mod error;
pub mod properties;
pub mod transactions;
pub mod types;
pub mod users;

pub use client::ApiClient;
pub use error::{ApiError, ApiOutcome, ApiResponse};
pub use types::{NewProperty, Property, SellOrder, TransactionRecord, User};
