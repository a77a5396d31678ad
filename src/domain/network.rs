//! Network configuration for EVM chains.
//!
//! This module defines the built-in networks the minter knows about and the
//! user-defined networks that can be added through the configuration file.

use serde::{Deserialize, Serialize};

// ============================================================================
// Built-in Networks
// ============================================================================

/// Built-in network variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    /// BNB Smart Chain testnet, where the minter is deployed.
    #[default]
    BscTestnet,
    /// A local development node (anvil, hardhat) with unlocked accounts.
    LocalNode,
}

impl Network {
    /// Returns the human-readable name of the network.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::BscTestnet => "BSC Testnet",
            Self::LocalNode => "Local node",
        }
    }

    /// Returns the JSON-RPC endpoint for this network.
    #[must_use]
    pub const fn rpc_url(&self) -> &str {
        match self {
            Self::BscTestnet => "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
            Self::LocalNode => "http://127.0.0.1:8545",
        }
    }

    /// Returns the block explorer transaction base URL, if the network has one.
    #[must_use]
    pub const fn explorer_tx_url(&self) -> Option<&str> {
        match self {
            Self::BscTestnet => Some("https://testnet.bscscan.com/tx"),
            Self::LocalNode => None,
        }
    }

    /// Symbol of the native currency.
    #[must_use]
    pub const fn currency(&self) -> &str {
        match self {
            Self::BscTestnet => "tBNB",
            Self::LocalNode => "ETH",
        }
    }

    /// Parses a network from its CLI spelling.
    #[must_use]
    pub fn from_cli_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bsc-testnet" | "bsctestnet" | "testnet" => Some(Self::BscTestnet),
            "local" | "localnode" | "localhost" => Some(Self::LocalNode),
            _ => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Custom Networks
// ============================================================================

/// A user-defined network with its own RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomNetwork {
    /// Display name.
    pub name: String,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Block explorer transaction base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_tx_url: Option<String>,
}

impl CustomNetwork {
    #[must_use]
    pub fn new(name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
            explorer_tx_url: None,
        }
    }

    #[must_use]
    pub fn with_explorer(mut self, url: impl Into<String>) -> Self {
        self.explorer_tx_url = Some(url.into());
        self
    }
}

/// Either a built-in network or a custom one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkConfig {
    BuiltIn(Network),
    Custom(CustomNetwork),
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::BuiltIn(Network::default())
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(network) => network.as_str(),
            Self::Custom(custom) => &custom.name,
        }
    }

    #[must_use]
    pub fn rpc_url(&self) -> &str {
        match self {
            Self::BuiltIn(network) => network.rpc_url(),
            Self::Custom(custom) => &custom.rpc_url,
        }
    }

    #[must_use]
    pub fn explorer_tx_url(&self) -> Option<&str> {
        match self {
            Self::BuiltIn(network) => network.explorer_tx_url(),
            Self::Custom(custom) => custom.explorer_tx_url.as_deref(),
        }
    }

    /// Symbol of the native currency. Custom networks are assumed to be ETH-denominated.
    #[must_use]
    pub fn currency(&self) -> &str {
        match self {
            Self::BuiltIn(network) => network.currency(),
            Self::Custom(_) => "ETH",
        }
    }

    /// Builds the explorer link for a transaction hash, if the network has an explorer.
    #[must_use]
    pub fn explorer_link(&self, hash: &alloy_primitives::TxHash) -> Option<String> {
        self.explorer_tx_url()
            .map(|base| format!("{}/{hash}", base.trim_end_matches('/')))
    }
}

// ============================================================================
// Tests
// ============================================================================
