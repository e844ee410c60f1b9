//! Listing flow states and the outcome reported to the user.

use alloy::primitives::{Address, TxHash};

use crate::blockchain::PendingCreation;
use serde::{Deserialize, Serialize};

/// Which step a failed listing flow stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStep {
    /// The backend refused or could not be reached; nothing exists yet.
    Backend,
    /// No wallet, refused account access, or the transaction was never submitted.
    Wallet,
    /// The transaction was submitted but its receipt could not be observed.
    Confirmation,
    /// The transaction was mined and reverted.
    Reverted,
    /// The transaction succeeded but no log yielded a property id.
    IdentifierUnresolved,
    /// The chain id is known but attaching it to the backend record failed.
    Link,
}

/// Where a single property listing stands.
///
/// ```text
/// Idle → BackendCreated → ChainPending → ChainConfirmed
///   └──────────┴──────────────┴──→ Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListingState {
    Idle,
    BackendCreated {
        backend_id: String,
        total_shares: u64,
    },
    ChainPending {
        backend_id: String,
        total_shares: u64,
        tx_hash: TxHash,
        account: Address,
    },
    ChainConfirmed {
        backend_id: String,
        total_shares: u64,
        blockchain_id: u64,
        tx_hash: TxHash,
    },
    Failed {
        /// Present whenever the backend record exists (and stays unlinked).
        backend_id: Option<String>,
        total_shares: u64,
        step: FailedStep,
        /// The submitted transaction, once there is one.
        transaction: Option<PendingCreation>,
        /// Only set for [`FailedStep::Link`], where the chain side is confirmed.
        blockchain_id: Option<u64>,
        error: String,
    },
}

impl ListingState {
    pub fn backend_id(&self) -> Option<&str> {
        match self {
            ListingState::Idle => None,
            ListingState::BackendCreated { backend_id, .. }
            | ListingState::ChainPending { backend_id, .. }
            | ListingState::ChainConfirmed { backend_id, .. } => Some(backend_id),
            ListingState::Failed { backend_id, .. } => backend_id.as_deref(),
        }
    }

    /// Short status label for display and logs.
    pub fn status(&self) -> &'static str {
        match self {
            ListingState::Idle => "idle",
            ListingState::BackendCreated { .. } => "backend_created",
            ListingState::ChainPending { .. } => "chain_pending",
            ListingState::ChainConfirmed { .. } => "chain_confirmed",
            ListingState::Failed { .. } => "failed",
        }
    }

    /// A backend record exists that has no on-chain counterpart yet.
    pub fn is_partial(&self) -> bool {
        self.backend_id().is_some() && !matches!(self, ListingState::ChainConfirmed { .. })
    }

    /// Whether the user can trigger (or retry) the on-chain step from here.
    pub fn can_create_on_chain(&self) -> bool {
        match self {
            ListingState::BackendCreated { .. } | ListingState::ChainPending { .. } => true,
            ListingState::Failed {
                backend_id: Some(_),
                step,
                ..
            } => *step != FailedStep::Backend,
            _ => false,
        }
    }

    pub fn outcome(&self) -> ListingOutcome {
        match self {
            ListingState::Idle => ListingOutcome::default(),
            ListingState::BackendCreated { backend_id, .. } => ListingOutcome {
                backend_id: Some(backend_id.clone()),
                ..ListingOutcome::default()
            },
            ListingState::ChainPending {
                backend_id,
                tx_hash,
                ..
            } => ListingOutcome {
                backend_id: Some(backend_id.clone()),
                transaction_hash: Some(tx_hash.to_string()),
                ..ListingOutcome::default()
            },
            ListingState::ChainConfirmed {
                backend_id,
                blockchain_id,
                tx_hash,
                ..
            } => ListingOutcome {
                success: true,
                backend_id: Some(backend_id.clone()),
                blockchain_id: Some(*blockchain_id),
                transaction_hash: Some(tx_hash.to_string()),
                ..ListingOutcome::default()
            },
            ListingState::Failed {
                backend_id,
                step,
                transaction,
                blockchain_id,
                error,
                ..
            } => ListingOutcome {
                success: false,
                backend_id: backend_id.clone(),
                blockchain_id: if *step == FailedStep::Link {
                    *blockchain_id
                } else {
                    None
                },
                transaction_hash: transaction.as_ref().map(|pending| pending.tx_hash.to_string()),
                error: Some(error.clone()),
                failed_step: Some(*step),
            },
        }
    }
}

/// Result of one user-initiated listing action.
///
/// `success` is true only once both the backend record and the chain
/// creation are confirmed and linked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FailedStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_hides_unconfirmed_chain_id() {
        let state = ListingState::Failed {
            backend_id: Some("P-1".to_string()),
            total_shares: 100,
            step: FailedStep::IdentifierUnresolved,
            transaction: Some(PendingCreation {
                tx_hash: TxHash::repeat_byte(1),
                account: Address::ZERO,
            }),
            blockchain_id: Some(5),
            error: "no event".to_string(),
        };
        let outcome = state.outcome();
        assert!(!outcome.success);
        assert_eq!(outcome.blockchain_id, None);
        assert_eq!(outcome.backend_id.as_deref(), Some("P-1"));
        assert!(state.is_partial());
        assert!(state.can_create_on_chain());
    }

    #[test]
    fn test_backend_failure_cannot_go_on_chain() {
        let state = ListingState::Failed {
            backend_id: None,
            total_shares: 100,
            step: FailedStep::Backend,
            transaction: None,
            blockchain_id: None,
            error: "Missing required fields".to_string(),
        };
        assert!(!state.can_create_on_chain());
        assert!(!state.is_partial());
        assert_eq!(state.outcome().failed_step, Some(FailedStep::Backend));
    }

    #[test]
    fn test_state_serialization() {
        let state = ListingState::ChainPending {
            backend_id: "P-1".to_string(),
            total_shares: 10,
            tx_hash: TxHash::repeat_byte(0xaa),
            account: Address::ZERO,
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["status"], "chain_pending");
        assert_eq!(value["backend_id"], "P-1");

        let restored: ListingState = serde_json::from_value(value).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_outcome_wire_format() {
        let outcome = ListingState::ChainConfirmed {
            backend_id: "P-1".to_string(),
            total_shares: 10,
            blockchain_id: 42,
            tx_hash: TxHash::ZERO,
        }
        .outcome();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["backendId"], "P-1");
        assert_eq!(value["blockchainId"], 42);
        assert!(value["transactionHash"].as_str().unwrap().starts_with("0x"));
        assert!(value.get("error").is_none());
    }
}
