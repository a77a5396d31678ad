//! Application state.
//!
//! The state is decomposed into independent concerns:
//!
//! - [`NavigationState`] - mounted view and selected card
//! - [`ReadCache`] - contract reads, keyed and invalidated per key
//! - [`UiState`] - popups, toasts and notification history
//! - [`WalletSession`] - the connected account
//! - [`FlowRegistry`] - transaction flows of the mounted view
//! - [`AppConfig`] - persistent configuration
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                               App                                │
//! ├────────────┬────────────┬──────────┬───────────────┬─────────────┤
//! │ Navigation │ ReadCache  │ UiState  │ WalletSession │ FlowRegistry│
//! │  - view    │  - values  │  - popup │  - account    │  - flows    │
//! │  - card    │  - status  │  - toast │  - attempts   │  - session  │
//! └────────────┴────────────┴──────────┴───────────────┴─────────────┘
//!        ▲                      │ spawned provider calls
//!        └──── AppMessage ◄─────┘
//! ```
//!
//! Provider calls run as spawned tasks and report back through an unbounded
//! channel of [`AppMessage`]s. The event loop is the only owner of the state.

use std::time::Instant;

use alloy_primitives::Address;
use tokio::sync::mpsc;

use crate::client::SharedProvider;
use crate::domain::ReadValue;
use crate::flow::{FlowEvent, FlowRegistry};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod data;
pub mod navigation;
pub mod ui_state;
pub mod view;
pub mod wallet;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{AppConfig, ConfigOverrides};
pub use data::{FetchTicket, ReadCache};
pub use navigation::{NavigationState, View};
pub use ui_state::{PopupState, UiState};
pub use wallet::{WalletSession, WalletStatus};

// ============================================================================
// App Message Types
// ============================================================================

/// Messages sent from spawned provider tasks to the main loop.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A contract read finished.
    ReadResolved {
        ticket: FetchTicket,
        result: Result<ReadValue, String>,
    },
    /// The signer's account list arrived for a connect attempt.
    AccountsLoaded {
        attempt: u64,
        result: Result<Vec<Address>, String>,
    },
    /// A simulation, submission or confirmation finished.
    Flow(FlowEvent),
}

// ============================================================================
// Startup Options
// ============================================================================

/// Options that customize the initial application state.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// View mounted on startup.
    pub view: View,
    /// Connect the wallet immediately.
    pub connect: bool,
    /// Problem found before the UI started, shown as a message popup.
    pub notice: Option<String>,
}

// ============================================================================
// Main App State
// ============================================================================

#[derive(Debug)]
pub struct App {
    // ========================================================================
    // Sub-states
    // ========================================================================
    pub nav: NavigationState,
    pub data: ReadCache,
    pub ui: UiState,
    pub wallet: WalletSession,
    pub flows: FlowRegistry,

    // ========================================================================
    // App-level state
    // ========================================================================
    pub config: AppConfig,

    /// Whether the application should exit.
    pub exit: bool,

    /// Animation tick counter for spinners.
    pub animation_tick: u64,

    /// When the watched reads were last refreshed.
    pub(crate) last_poll: Instant,

    // ========================================================================
    // Async Communication
    // ========================================================================
    // Channel sends use `let _ = tx.send(...)`: the receiver only goes away
    // during shutdown.
    pub(crate) message_tx: mpsc::UnboundedSender<AppMessage>,
    pub(crate) message_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub(crate) provider: SharedProvider,

    pub(crate) startup_options: Option<StartupOptions>,
}

impl App {
    /// Borrowed inputs for the view derivations.
    #[must_use]
    pub fn view_inputs(&self) -> view::ViewInputs<'_> {
        view::ViewInputs {
            account: self.wallet.account(),
            config: &self.config,
            reads: &self.data,
            flows: &self.flows,
        }
    }
}

// ============================================================================
// Implementation Modules
// ============================================================================

// Construction, event loop, ticking
mod app_lifecycle;

// Message processing, reconcile pass, effect execution
mod app_messages;

// Key handling and command dispatch
mod app_commands;

// Wallet, transactions, browser and clipboard actions
mod app_actions;

// ============================================================================
// Tests
// ============================================================================
