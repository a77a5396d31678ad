//! Application configuration with persistence.
//!
//! This module provides the [`AppConfig`] structure for managing application
//! settings with automatic load/save to disk.
//!
//! # Configuration File Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/nftstake/config.json`
//! - macOS: `~/Library/Application Support/nftstake/config.json`
//! - Windows: `%APPDATA%/nftstake/config.json`
//!
//! Missing fields fall back to their defaults, so a file containing only
//! `{"staking_address": "0x..."}` is valid.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::{Address, U256, address};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::domain::{ContractSet, CustomNetwork, Network, NetworkConfig, parse_ether};

// ============================================================================
// Constants
// ============================================================================

/// Application name used for the configuration and data directories.
pub const APP_DIR: &str = "nftstake";

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// NFT minter deployed on BSC testnet.
const DEFAULT_NFT_ADDRESS: Address = address!("95eab98e2b37867e86372361d9996c0edbd5d076");

const DEFAULT_IPFS_URI: &str =
    "https://ipfs.io/ipfs/QmZmsHnadyws9is5KApM1ovqLE5g31oVMgTT714yd1FkWj";

/// 0.0001 BNB in wei.
const DEFAULT_MINT_PRICE_WEI: u64 = 100_000_000_000_000;

// ============================================================================
// AppConfig
// ============================================================================

/// Application configuration structure for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// The selected network.
    pub network: NetworkConfig,
    /// User-defined networks, selectable by name with `--network`.
    pub custom_networks: Vec<CustomNetwork>,
    /// NFT contract address.
    pub nft_address: Address,
    /// Staking / reward-token contract address. Staking is disabled without it.
    pub staking_address: Option<Address>,
    /// Base URI of the token images.
    pub ipfs_uri: String,
    /// Title shown in the header.
    pub app_name: String,
    /// Symbol of the reward token.
    pub token_symbol: String,
    /// Decimals of the reward token and of the native currency.
    pub token_decimals: u8,
    /// Number of NFTs that can ever be minted.
    pub max_supply: u64,
    /// Mint price in wei.
    pub mint_price: U256,
    /// Id of the first minted token; the next id is this plus the total supply.
    pub first_token_id: u64,
    /// Account to send from when the node manages several.
    pub account: Option<Address>,
    /// Seconds between refreshes of rewards and balances.
    pub poll_interval_secs: u64,
    /// Seconds to wait for a receipt before giving up.
    pub receipt_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::BuiltIn(Network::BscTestnet),
            custom_networks: Vec::new(),
            nft_address: DEFAULT_NFT_ADDRESS,
            staking_address: None,
            ipfs_uri: DEFAULT_IPFS_URI.to_string(),
            app_name: "NFT Marketplace".to_string(),
            token_symbol: "SNK".to_string(),
            token_decimals: 18,
            max_supply: 5,
            mint_price: U256::from(DEFAULT_MINT_PRICE_WEI),
            first_token_id: 1,
            account: None,
            poll_interval_secs: 10,
            receipt_timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined
    /// or created.
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "Could not determine config directory. Expected XDG_CONFIG_HOME or ~/.config on Linux, ~/Library/Application Support on macOS, %APPDATA% on Windows"
            )
        })?;
        path.push(APP_DIR);
        fs::create_dir_all(&path)?;
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads the configuration file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined, the file cannot be
    /// read, or its JSON content cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration stored at `path`. A missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content)
                .map_err(|e| color_eyre::eyre::eyre!("{}: {e}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Saves the configuration to disk and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined or the file cannot
    /// be written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Resolves a network by name: built-in networks first, then custom ones.
    #[must_use]
    pub fn find_network(&self, name: &str) -> Option<NetworkConfig> {
        Network::from_cli_name(name)
            .map(NetworkConfig::BuiltIn)
            .or_else(|| {
                self.custom_networks
                    .iter()
                    .find(|n| n.name.eq_ignore_ascii_case(name))
                    .cloned()
                    .map(NetworkConfig::Custom)
            })
    }

    /// Applies command-line overrides on top of the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown network name.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(name) = &overrides.network {
            self.network = self
                .find_network(name)
                .ok_or_else(|| color_eyre::eyre::eyre!("Unknown network '{name}'"))?;
        }
        if let Some(url) = &overrides.rpc_url {
            let explorer = self.network.explorer_tx_url().map(str::to_string);
            let mut custom = CustomNetwork::new(self.network.name(), url.clone());
            if let Some(explorer) = explorer {
                custom = custom.with_explorer(explorer);
            }
            self.network = NetworkConfig::Custom(custom);
        }
        if let Some(account) = overrides.account {
            self.account = Some(account);
        }
        if let Some(staking) = overrides.staking {
            self.staking_address = Some(staking);
        }
        if let Some(price) = &overrides.mint_price {
            self.mint_price = parse_ether(price)?;
        }
        Ok(())
    }

    /// Addresses of the configured contracts.
    #[must_use]
    pub const fn contracts(&self) -> ContractSet {
        ContractSet {
            nft: self.nft_address,
            staking: self.staking_address,
        }
    }

    #[must_use]
    pub fn max_supply(&self) -> U256 {
        U256::from(self.max_supply)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    #[must_use]
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub account: Option<Address>,
    pub staking: Option<Address>,
    /// Mint price in whole native units, e.g. `0.0001`.
    pub mint_price: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
