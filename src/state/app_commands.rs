//! Command execution and input handling.
//!
//! Keys are mapped to [`AppCommand`]s by [`KeyMapper`], executed here, and
//! followed by a reconcile pass so reads and flows track the new state.

use crossterm::event::KeyEvent;

use super::{App, PopupState};
use crate::commands::{AppCommand, InputContext, KeyMapper};

impl App {
    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) {
        let context = self.input_context();
        let command = KeyMapper::map_key(key_event, &context);
        self.execute_command(command);
        self.reconcile();
    }

    /// Determines which keybindings are active. Popups take precedence.
    #[must_use]
    pub fn input_context(&self) -> InputContext {
        match &self.ui.popup_state {
            PopupState::Help => InputContext::HelpPopup,
            PopupState::History => InputContext::HistoryPopup,
            PopupState::Message(_) => InputContext::MessagePopup,
            PopupState::None => InputContext::Main(self.nav.view()),
        }
    }

    /// Executes an application command.
    pub(crate) fn execute_command(&mut self, command: AppCommand) {
        if command.is_transaction() {
            tracing::debug!(?command, view = ?self.nav.view(), "transaction command");
        }

        match command {
            // === Application Control ===
            AppCommand::Quit => self.exit = true,
            AppCommand::Refresh => self.refresh(),
            AppCommand::ToggleHelp => self.ui.toggle_help(),
            AppCommand::ToggleHistory => self.ui.toggle_history(),
            AppCommand::Dismiss => self.ui.dismiss_popup(),

            // === Wallet ===
            AppCommand::ToggleConnection => self.toggle_connection(),

            // === Navigation ===
            AppCommand::NextView => self.switch_view(self.nav.view().next()),
            AppCommand::ShowView(view) => self.switch_view(view),
            AppCommand::MoveUp => {
                let count = self.card_count();
                self.nav.select_previous(count);
            }
            AppCommand::MoveDown => {
                let count = self.card_count();
                self.nav.select_next(count);
            }

            // === Transactions ===
            AppCommand::Mint => self.mint(),
            AppCommand::Execute => self.execute_selected(),

            // === External ===
            AppCommand::OpenImage => self.open_image(),
            AppCommand::OpenExplorer => self.open_explorer(),
            AppCommand::CopyTxHash => self.copy_tx_hash(),

            AppCommand::Noop => {}
        }
    }
}
