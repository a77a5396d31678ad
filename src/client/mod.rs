//! Contract-call providers.
//!
//! The app never talks to the chain directly: everything goes through a
//! [`ContractProvider`], which exposes the four primitives a transaction flow
//! needs (read, simulate, submit, wait for confirmation) plus the accounts the
//! connected signer controls.
//!
//! - [`rpc`] - JSON-RPC provider for nodes that manage their own accounts

pub mod rpc;

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::domain::{ContractCall, ProviderError};

// ============================================================================
// Re-exports
// ============================================================================

pub use rpc::{JsonRpcProvider, RpcSettings};

// ============================================================================
// Provider Trait
// ============================================================================

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the transaction.
    pub hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// `false` if the transaction reverted.
    pub success: bool,
}

/// Read, simulate, submit and confirm contract calls.
#[async_trait]
pub trait ContractProvider: Send + Sync + std::fmt::Debug {
    /// Accounts the connected signer can send from.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Executes a read-only call and returns the raw return data.
    async fn read(&self, call: &ContractCall) -> Result<Bytes, ProviderError>;

    /// Validates a write against current chain state without submitting it.
    async fn simulate(&self, from: Address, call: &ContractCall) -> Result<(), ProviderError>;

    /// Submits a write and returns its transaction hash.
    async fn submit(&self, from: Address, call: &ContractCall) -> Result<TxHash, ProviderError>;

    /// Resolves once the transaction has a receipt.
    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<Receipt, ProviderError>;
}

/// Provider handle shared between the event loop and spawned tasks.
pub type SharedProvider = Arc<dyn ContractProvider>;
