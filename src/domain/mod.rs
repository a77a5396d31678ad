//! Domain types for the nftstake terminal minter.
//!
//! # Module Organization
//!
//! - [`error`] - Provider and transaction error types
//! - [`network`] - Network configuration (BSC testnet, local node, custom)
//! - [`contracts`] - Contract interfaces, call descriptors and read keys
//! - [`token`] - NFT identifiers and image locations
//! - [`units`] - Minor-unit amount formatting and parsing

pub mod contracts;
pub mod error;
pub mod network;
pub mod token;
pub mod units;

// ============================================================================
// Re-exports
// ============================================================================

pub use contracts::{ContractCall, ContractFunction, ContractSet, ReadKey, ReadValue};
pub use error::{ProviderError, TxError};
pub use network::{CustomNetwork, Network, NetworkConfig};
pub use token::TokenId;
pub use units::{format_ether, format_units, parse_ether};
