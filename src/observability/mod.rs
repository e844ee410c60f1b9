//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! api / blockchain / listing
//!     → structured tracing events (endpoint, status, tx_hash, backend_id)
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```
//!
//! Bearer tokens and private keys are never recorded as fields.

pub mod logging;

pub use logging::init_logging;
