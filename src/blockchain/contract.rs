//! Property registry contract interface.
//!
//! The typed bindings drive the `createProperty` call; the runtime
//! [`JsonAbi`] descriptor is what receipt logs are decoded against, so a
//! deployment with a different ABI file can be used without recompiling.

use alloy::json_abi::JsonAbi;
use alloy::sol;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    #[sol(rpc)]
    contract PropertyRegistry {
        /// Emitted once per successful `createProperty` call.
        #[derive(Debug)]
        event PropertyCreated(uint256 indexed propertyId, address indexed owner, uint256 totalShares);

        function createProperty(uint256 totalShares) external returns (uint256 propertyId);
    }
}

/// Human-readable form of the built-in interface.
pub const DEFAULT_INTERFACE: &[&str] = &[
    "function createProperty(uint256 totalShares) returns (uint256 propertyId)",
    "event PropertyCreated(uint256 indexed propertyId, address indexed owner, uint256 totalShares)",
];

/// Build artifacts wrap the ABI in an object.
#[derive(Deserialize)]
struct Artifact {
    abi: JsonAbi,
}

/// The built-in interface descriptor.
pub fn default_interface() -> BlockchainResult<JsonAbi> {
    JsonAbi::parse(DEFAULT_INTERFACE.iter().copied())
        .map_err(|e| BlockchainError::InvalidAbi(e.to_string()))
}

/// Load the interface from a JSON ABI (or build artifact) file, falling back to the built-in one.
pub fn load_interface(path: Option<&Path>) -> BlockchainResult<JsonAbi> {
    let Some(path) = path else {
        return default_interface();
    };

    let content = fs::read_to_string(path)
        .map_err(|e| BlockchainError::InvalidAbi(format!("{}: {}", path.display(), e)))?;
    parse_interface(&content)
        .map_err(|e| BlockchainError::InvalidAbi(format!("{}: {}", path.display(), e)))
}

fn parse_interface(content: &str) -> Result<JsonAbi, serde_json::Error> {
    match serde_json::from_str::<JsonAbi>(content) {
        Ok(abi) => Ok(abi),
        Err(_) => serde_json::from_str::<Artifact>(content).map(|artifact| artifact.abi),
    }
}
