//! Application lifecycle management.
//!
//! - `new()` / `with_provider()` - construct the app
//! - `run()` - main event loop
//! - `tick()` - per-tick housekeeping (spinners, toasts, watched reads)

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

use crate::client::{JsonRpcProvider, RpcSettings, SharedProvider};
use crate::flow::FlowRegistry;
use crate::tui::Tui;
use crate::ui;

use super::{App, AppConfig, NavigationState, ReadCache, StartupOptions, UiState, WalletSession};

const TICK_RATE: Duration = Duration::from_millis(100);

impl App {
    /// Creates an app talking to the configured network over JSON-RPC.
    ///
    /// # Errors
    /// Returns an error if the RPC endpoint is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(config: AppConfig, options: StartupOptions) -> Result<Self> {
        let url = config.network.rpc_url();
        let endpoint = reqwest::Url::parse(url)
            .map_err(|e| color_eyre::eyre::eyre!("Invalid RPC URL '{url}': {e}"))?;

        let settings =
            RpcSettings::new(endpoint).with_receipt_timeout(config.receipt_timeout());
        let provider: SharedProvider = Arc::new(JsonRpcProvider::new(settings)?);

        tracing::info!(network = config.network.name(), rpc = url, "starting");
        Ok(Self::with_provider(config, provider, options))
    }

    /// Creates an app on top of an existing provider.
    #[must_use]
    pub fn with_provider(
        config: AppConfig,
        provider: SharedProvider,
        options: StartupOptions,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            nav: NavigationState::new(options.view),
            data: ReadCache::new(),
            ui: UiState::new(),
            wallet: WalletSession::new(config.account),
            flows: FlowRegistry::new(),
            config,
            exit: false,
            animation_tick: 0,
            last_poll: Instant::now(),
            message_tx,
            message_rx,
            provider,
            startup_options: Some(options),
        }
    }

    /// Applies the startup options and mounts the first view.
    pub fn start(&mut self) {
        if let Some(options) = self.startup_options.take() {
            if let Some(notice) = options.notice {
                self.ui.show_message(notice);
            }
            if options.connect {
                self.connect_wallet();
            }
        }
        self.reconcile();
    }

    /// Runs the main application loop.
    ///
    /// # Errors
    /// Returns an error if the terminal operations fail.
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        self.start();
        let mut last_tick = Instant::now();

        while !self.exit {
            self.process_messages();

            let timeout = TICK_RATE
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::from_secs(0));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key)
                        if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                    {
                        self.handle_key_event(key);
                    }
                    Event::Resize(_, _) => {
                        terminal.draw(|frame| ui::render(self, frame))?;
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                self.tick();
                terminal.draw(|frame| ui::render(self, frame))?;
                last_tick = Instant::now();
            }

            // Lets spawned provider tasks make progress between frames.
            tokio::task::yield_now().await;
        }

        self.flows.teardown();
        Ok(())
    }

    /// Per-tick housekeeping.
    pub fn tick(&mut self) {
        self.animation_tick = self.animation_tick.wrapping_add(1);
        self.ui.tick_toast();

        if self.last_poll.elapsed() >= self.config.poll_interval() {
            self.last_poll = Instant::now();
            self.poll_watched_reads();
        }
    }
}
