//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and addresses before any client is built
//! - Validate value ranges (poll interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.api.base_url) {
        errors.push(ValidationError::new("api.base_url", e.to_string()));
    }

    if config.session.path.trim().is_empty() {
        errors.push(ValidationError::new("session.path", "must not be empty"));
    }

    if config.listing.store_path.trim().is_empty() {
        errors.push(ValidationError::new("listing.store_path", "must not be empty"));
    }

    let chain = &config.blockchain;
    if let Some(wallet_url) = &chain.wallet_url {
        if let Err(e) = url::Url::parse(wallet_url) {
            errors.push(ValidationError::new("blockchain.wallet_url", e.to_string()));
        }
    }
    if chain.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.contract_address",
            format!("'{}' is not a valid address", chain.contract_address),
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be greater than 0"));
    }
    if chain.event_name.trim().is_empty() {
        errors.push(ValidationError::new("blockchain.event_name", "must not be empty"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}', expected 'pretty' or 'json'", other),
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
