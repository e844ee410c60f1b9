//! Property creation reconciliation.
//!
//! # Responsibilities
//! - Create the backend record (`submit`)
//! - On explicit request, create the property on-chain and link the
//!   resulting identifier to the backend record (`create_on_chain`)
//! - Persist every transition so an interrupted flow can be resumed
//!
//! # Design Decisions
//! - Strictly sequential: one outward call at a time
//! - No automatic retries and no rollback: a backend record whose chain
//!   step failed stays, unlinked, until the user retries the chain step
//! - A retry restarts from the failed step: a submitted transaction is
//!   waited on again rather than resent, and a failed link only re-links
//! - The chain side (wallet and contract interface) may be attached late,
//!   so the backend step never depends on wallet setup

use alloy::json_abi::JsonAbi;
use async_trait::async_trait;
use std::fmt::Display;
use thiserror::Error;

use crate::api::{ApiClient, ApiResponse, NewProperty, Property};
use crate::blockchain::{BlockchainError, PendingCreation, WalletBridge};
use crate::listing::state::{FailedStep, ListingOutcome, ListingState};
use crate::listing::store::ListingStore;

/// Errors for actions the current state does not allow.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Cannot {action} while listing is {status}")]
    InvalidTransition {
        action: &'static str,
        status: &'static str,
    },

    /// No wallet or contract interface could be set up. The recorded state
    /// is left as it was.
    #[error("On-chain creation unavailable: {0}")]
    ChainUnavailable(String),
}

/// The backend operations the flow needs.
#[async_trait]
pub trait PropertyBackend: Send + Sync {
    async fn create_property(&self, property: &NewProperty) -> ApiResponse<Property>;

    async fn link_blockchain_id(&self, backend_id: &str, blockchain_id: u64) -> ApiResponse<Property>;
}

#[async_trait]
impl PropertyBackend for ApiClient {
    async fn create_property(&self, property: &NewProperty) -> ApiResponse<Property> {
        ApiClient::create_property(self, property).await
    }

    async fn link_blockchain_id(&self, backend_id: &str, blockchain_id: u64) -> ApiResponse<Property> {
        ApiClient::link_blockchain_id(self, backend_id, blockchain_id).await
    }
}

/// Contract interface and event used to recover the on-chain identifier.
#[derive(Debug, Clone)]
pub struct ChainInterface {
    pub abi: JsonAbi,
    pub event_name: String,
}

struct ChainSide<W> {
    wallet: W,
    interface: ChainInterface,
}

/// One listing's backend-then-chain creation sequence.
pub struct ListingFlow<B, W> {
    backend: B,
    chain: Option<ChainSide<W>>,
    state: ListingState,
    store: Option<ListingStore>,
}

impl<B: PropertyBackend, W: WalletBridge> ListingFlow<B, W> {
    /// Start a new listing.
    pub fn new(backend: B, wallet: W, interface: ChainInterface) -> Self {
        Self::resume(backend, wallet, interface, ListingState::Idle)
    }

    /// Continue a listing from a previously recorded state.
    pub fn resume(backend: B, wallet: W, interface: ChainInterface, state: ListingState) -> Self {
        Self::without_chain(backend, state).with_chain(wallet, interface)
    }

    /// A flow with only the backend side. The chain side is attached with
    /// [`ListingFlow::with_chain`] or built by [`ListingFlow::create_on_chain_with`].
    pub fn without_chain(backend: B, state: ListingState) -> Self {
        Self {
            backend,
            chain: None,
            state,
            store: None,
        }
    }

    pub fn with_chain(mut self, wallet: W, interface: ChainInterface) -> Self {
        self.chain = Some(ChainSide { wallet, interface });
        self
    }

    /// Record every transition in `store`.
    pub fn with_store(mut self, store: ListingStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn outcome(&self) -> ListingOutcome {
        self.state.outcome()
    }

    /// Create the backend record. A failure here ends the flow before any chain call.
    pub async fn submit(&mut self, property: &NewProperty) -> Result<ListingOutcome, ListingError> {
        let retryable = matches!(
            self.state,
            ListingState::Idle
                | ListingState::Failed {
                    step: FailedStep::Backend,
                    ..
                }
        );
        if !retryable {
            return Err(self.invalid("submit the property"));
        }

        let next = match self.backend.create_property(property).await {
            Ok(created) => ListingState::BackendCreated {
                backend_id: created.property_id,
                total_shares: created.total_shares,
            },
            Err(e) => ListingState::Failed {
                backend_id: None,
                total_shares: property.total_shares,
                step: FailedStep::Backend,
                transaction: None,
                blockchain_id: None,
                error: e.message,
            },
        };
        self.transition(next);
        Ok(self.outcome())
    }

    /// Create the property on-chain and link it to the backend record.
    ///
    /// Only called on explicit user request; resumes from wherever the
    /// previous attempt stopped.
    pub async fn create_on_chain(&mut self) -> Result<ListingOutcome, ListingError> {
        if !self.state.can_create_on_chain() {
            return Err(self.invalid("create the property on-chain"));
        }
        let Some(chain) = self.chain.take() else {
            return Err(ListingError::ChainUnavailable(
                "no wallet attached".to_string(),
            ));
        };

        self.run_chain_step(&chain).await;
        self.chain = Some(chain);
        Ok(self.outcome())
    }

    /// Like [`ListingFlow::create_on_chain`], building the chain side with
    /// `connect` first if none is attached. `connect` only runs when the
    /// current state allows the chain step.
    pub async fn create_on_chain_with<F, E>(&mut self, connect: F) -> Result<ListingOutcome, ListingError>
    where
        F: FnOnce() -> Result<(W, ChainInterface), E>,
        E: Display,
    {
        if !self.state.can_create_on_chain() {
            return Err(self.invalid("create the property on-chain"));
        }
        if self.chain.is_none() {
            let (wallet, interface) = connect().map_err(|e| {
                tracing::warn!(
                    backend_id = self.state.backend_id().unwrap_or("-"),
                    error = %e,
                    "Wallet setup failed"
                );
                ListingError::ChainUnavailable(e.to_string())
            })?;
            self.chain = Some(ChainSide { wallet, interface });
        }
        self.create_on_chain().await
    }

    async fn run_chain_step(&mut self, chain: &ChainSide<W>) {
        let pending = match self.state.clone() {
            ListingState::ChainPending {
                tx_hash, account, ..
            } => PendingCreation { tx_hash, account },
            ListingState::Failed {
                step: FailedStep::Link,
                blockchain_id: Some(blockchain_id),
                transaction: Some(pending),
                ..
            } => {
                self.link(blockchain_id, pending).await;
                return;
            }
            ListingState::Failed {
                step: FailedStep::Confirmation,
                transaction: Some(pending),
                ..
            } => pending,
            _ => match self.submit_transaction(&chain.wallet).await {
                Some(pending) => pending,
                None => return,
            },
        };

        self.transition(ListingState::ChainPending {
            backend_id: self.backend_id(),
            total_shares: self.total_shares(),
            tx_hash: pending.tx_hash,
            account: pending.account,
        });

        let receipt = match chain.wallet.wait_for_receipt(&pending).await {
            Ok(receipt) => receipt,
            Err(BlockchainError::Reverted(_)) => {
                self.fail(
                    FailedStep::Reverted,
                    Some(pending),
                    "Transaction reverted on-chain".to_string(),
                );
                return;
            }
            Err(e) => {
                self.fail(FailedStep::Confirmation, Some(pending), e.to_string());
                return;
            }
        };

        let creation = receipt.resolve_creation(&chain.interface.abi, &chain.interface.event_name);
        let Some(property_id) = creation.property_id else {
            self.fail(
                FailedStep::IdentifierUnresolved,
                Some(pending),
                format!(
                    "Transaction confirmed but no {} event was found in its logs",
                    chain.interface.event_name
                ),
            );
            return;
        };
        let Ok(blockchain_id) = u64::try_from(property_id) else {
            self.fail(
                FailedStep::IdentifierUnresolved,
                Some(pending),
                format!("On-chain property id {} does not fit the backend's id range", property_id),
            );
            return;
        };

        tracing::info!(
            backend_id = %self.backend_id(),
            blockchain_id = blockchain_id,
            tx_hash = %creation.tx_hash,
            "On-chain property id resolved"
        );
        self.link(blockchain_id, pending).await;
    }

    /// Request account access and submit the transaction. `None` means the
    /// flow has moved to `Failed`.
    async fn submit_transaction(&mut self, wallet: &W) -> Option<PendingCreation> {
        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.fail(FailedStep::Wallet, None, e.to_string());
                return None;
            }
        };
        let Some(account) = accounts.first().copied() else {
            self.fail(FailedStep::Wallet, None, BlockchainError::NoAccounts.to_string());
            return None;
        };

        match wallet
            .submit_create_property(account, self.total_shares())
            .await
        {
            Ok(pending) => Some(pending),
            Err(e) => {
                self.fail(FailedStep::Wallet, None, e.to_string());
                None
            }
        }
    }

    async fn link(&mut self, blockchain_id: u64, pending: PendingCreation) {
        let backend_id = self.backend_id();
        let next = match self.backend.link_blockchain_id(&backend_id, blockchain_id).await {
            Ok(_) => ListingState::ChainConfirmed {
                backend_id,
                total_shares: self.total_shares(),
                blockchain_id,
                tx_hash: pending.tx_hash,
            },
            Err(e) => ListingState::Failed {
                backend_id: Some(backend_id),
                total_shares: self.total_shares(),
                step: FailedStep::Link,
                transaction: Some(pending),
                blockchain_id: Some(blockchain_id),
                error: e.message,
            },
        };
        self.transition(next);
    }

    fn fail(&mut self, step: FailedStep, transaction: Option<PendingCreation>, error: String) {
        self.transition(ListingState::Failed {
            backend_id: self.state.backend_id().map(str::to_string),
            total_shares: self.total_shares(),
            step,
            transaction,
            blockchain_id: None,
            error,
        });
    }

    fn transition(&mut self, next: ListingState) {
        match &next {
            ListingState::Failed { step, error, .. } => tracing::warn!(
                from = self.state.status(),
                backend_id = next.backend_id().unwrap_or("-"),
                step = ?step,
                error = %error,
                "Listing step failed"
            ),
            _ => tracing::info!(
                from = self.state.status(),
                to = next.status(),
                backend_id = next.backend_id().unwrap_or("-"),
                "Listing state changed"
            ),
        }

        self.state = next;
        if let Some(store) = &self.store {
            if let Err(e) = store.record(&self.state) {
                tracing::warn!(error = %e, "Failed to persist listing state");
            }
        }
    }

    fn invalid(&self, action: &'static str) -> ListingError {
        ListingError::InvalidTransition {
            action,
            status: self.state.status(),
        }
    }

    fn backend_id(&self) -> String {
        self.state.backend_id().unwrap_or_default().to_string()
    }

    fn total_shares(&self) -> u64 {
        match &self.state {
            ListingState::Idle => 0,
            ListingState::BackendCreated { total_shares, .. }
            | ListingState::ChainPending { total_shares, .. }
            | ListingState::ChainConfirmed { total_shares, .. }
            | ListingState::Failed { total_shares, .. } => *total_shares,
        }
    }
}
