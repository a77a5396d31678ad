//! Command pattern for key event handling.
//!
//! Key input is translated into semantic [`AppCommand`]s by a pure function,
//! so keybindings can be tested in isolation from the app state.
//!
//! ```ignore
//! let context = app.input_context();
//! let command = KeyMapper::map_key(key_event, &context);
//! app.execute_command(command);
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::View;

// ============================================================================
// Input Context
// ============================================================================

/// Which keybindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// A view is mounted and no popup is open.
    Main(View),
    /// A message popup is open.
    MessagePopup,
    /// The help popup is open.
    HelpPopup,
    /// The notification history is open.
    HistoryPopup,
}

// ============================================================================
// App Commands
// ============================================================================

/// All commands the application can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    // === Application Control ===
    Quit,
    /// Refetch every read and re-simulate idle actions.
    Refresh,
    ToggleHelp,
    ToggleHistory,
    Dismiss,

    // === Wallet ===
    ToggleConnection,

    // === Navigation ===
    NextView,
    ShowView(View),
    MoveUp,
    MoveDown,

    // === Transactions ===
    Mint,
    /// Primary action of the focused item: mint on the Minter, the selected
    /// card's approve / stake / unstake on the Gallery.
    Execute,

    // === External ===
    OpenImage,
    OpenExplorer,
    CopyTxHash,

    Noop,
}

impl AppCommand {
    /// Returns `true` if this command starts a transaction.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(self, Self::Mint | Self::Execute)
    }
}

// ============================================================================
// Key Mapper
// ============================================================================

/// Maps key events to application commands based on the current input context.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMapper;

impl KeyMapper {
    /// Maps a key event to a command. Pure, no side effects.
    #[must_use]
    pub fn map_key(key: KeyEvent, context: &InputContext) -> AppCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppCommand::Quit;
        }
        match context {
            InputContext::Main(view) => Self::map_main_keys(key, *view),
            InputContext::MessagePopup => Self::map_message_popup_keys(key),
            InputContext::HelpPopup => Self::map_help_popup_keys(key),
            InputContext::HistoryPopup => Self::map_history_popup_keys(key),
        }
    }

    fn map_main_keys(key: KeyEvent, view: View) -> AppCommand {
        match key.code {
            KeyCode::Char('q') => AppCommand::Quit,
            KeyCode::Char('r') => AppCommand::Refresh,
            KeyCode::Char('?') => AppCommand::ToggleHelp,
            KeyCode::Char('n') => AppCommand::ToggleHistory,
            KeyCode::Char('c') => AppCommand::ToggleConnection,
            KeyCode::Tab | KeyCode::BackTab => AppCommand::NextView,
            KeyCode::Char('1') => AppCommand::ShowView(View::Minter),
            KeyCode::Char('2') => AppCommand::ShowView(View::Gallery),
            KeyCode::Char('m') => AppCommand::Mint,
            KeyCode::Enter => AppCommand::Execute,
            KeyCode::Up | KeyCode::Char('k') if view == View::Gallery => AppCommand::MoveUp,
            KeyCode::Down | KeyCode::Char('j') if view == View::Gallery => AppCommand::MoveDown,
            KeyCode::Char('o') => AppCommand::OpenImage,
            KeyCode::Char('x') => AppCommand::OpenExplorer,
            KeyCode::Char('y') => AppCommand::CopyTxHash,
            KeyCode::Esc => AppCommand::Dismiss,
            _ => AppCommand::Noop,
        }
    }

    fn map_message_popup_keys(key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => AppCommand::Dismiss,
            KeyCode::Char('q') => AppCommand::Quit,
            _ => AppCommand::Noop,
        }
    }

    fn map_help_popup_keys(key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => AppCommand::Dismiss,
            KeyCode::Char('q') => AppCommand::Quit,
            _ => AppCommand::Noop,
        }
    }

    fn map_history_popup_keys(key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('n') => AppCommand::Dismiss,
            KeyCode::Char('q') => AppCommand::Quit,
            _ => AppCommand::Noop,
        }
    }
}

/// Keybindings shown in the help popup, as (keys, description).
pub const KEYBINDINGS: &[(&str, &str)] = &[
    ("Tab / 1 / 2", "Switch between Minter and Gallery"),
    ("c", "Connect / disconnect wallet"),
    ("m", "Mint the next NFT"),
    ("Up / Down", "Select an NFT card"),
    ("Enter", "Mint, or approve / stake / unstake the selected NFT"),
    ("r", "Refresh contract data"),
    ("o", "Open the image in the browser"),
    ("x", "Open the last transaction in the explorer"),
    ("y", "Copy the last transaction hash"),
    ("n", "Show recent transaction notifications"),
    ("?", "Toggle this help"),
    ("Esc", "Close popup"),
    ("q", "Quit"),
];

// ============================================================================
// Tests
// ============================================================================
