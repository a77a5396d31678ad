use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod domain;
mod flow;
mod state;
mod theme;
mod tui;
mod ui;

#[cfg(test)]
mod test_utils;

use crate::state::{App, AppConfig, ConfigOverrides, StartupOptions, View};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_ENV: &str = "NFTSTAKE_LOG";
const LOG_FILE: &str = "nftstake.log";

/// nftstake - mint NFTs and stake them for token rewards from the terminal
#[derive(Parser)]
#[command(version = VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Network to use (`bsc-testnet`, `local` or a custom network name)
    #[arg(short, long)]
    network: Option<String>,

    /// JSON-RPC endpoint, replacing the network's default
    #[arg(long)]
    rpc_url: Option<String>,

    /// Account to connect with (must be managed by the node)
    #[arg(short, long)]
    account: Option<Address>,

    /// Address of the staking contract
    #[arg(long)]
    staking: Option<Address>,

    /// Mint price in native units, e.g. 0.0001
    #[arg(long)]
    mint_price: Option<String>,

    /// Start on the gallery instead of the minter
    #[arg(short, long)]
    gallery: bool,

    /// Connect the wallet on startup
    #[arg(short, long)]
    connect: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration file location and its effective content
    Config {
        /// Write the effective configuration (file plus flags) back to disk
        #[arg(long)]
        save: bool,
    },
    /// Display the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if matches!(cli.command, Some(Commands::Version)) {
        println!("nftstake v{VERSION}");
        return Ok(());
    }

    let log_path = init_logging()?;
    tracing::info!(version = VERSION, log = %log_path.display(), "nftstake starting");

    let (mut config, notice) = load_config();
    config.apply_overrides(&ConfigOverrides {
        network: cli.network.clone(),
        rpc_url: cli.rpc_url.clone(),
        account: cli.account,
        staking: cli.staking,
        mint_price: cli.mint_price.clone(),
    })?;

    if let Some(Commands::Config { save }) = cli.command {
        println!("{}", AppConfig::config_path()?.display());
        println!("{}", serde_json::to_string_pretty(&config)?);
        if save {
            let path = config.save()?;
            println!("Saved to {}", path.display());
        }
        return Ok(());
    }

    let options = StartupOptions {
        view: if cli.gallery { View::Gallery } else { View::Minter },
        connect: cli.connect,
        notice,
    };
    let mut app = App::new(config, options)?;

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "app exited with an error");
    }
    result
}

/// Loads the config file. A broken file is reported and replaced by defaults.
fn load_config() -> (AppConfig, Option<String>) {
    match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(error = %err, "config not loaded, using defaults");
            eprintln!("Ignoring configuration file: {err}");
            let notice = format!("Configuration file ignored, using defaults.\n{err}");
            (AppConfig::default(), Some(notice))
        }
    }
}

/// Sends tracing output to a file; stdout belongs to the terminal UI.
fn init_logging() -> Result<PathBuf> {
    let mut path = dirs::data_local_dir()
        .ok_or_else(|| eyre!("Could not determine the local data directory"))?;
    path.push("nftstake");
    fs::create_dir_all(&path)?;
    path.push(LOG_FILE);

    let file = File::options().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}
