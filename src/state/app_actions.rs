//! Application actions: wallet connection, view switching, transactions,
//! browser and clipboard integration.

use alloy_primitives::TxHash;
use arboard::Clipboard;

#[cfg(target_os = "linux")]
use std::io::Write;
#[cfg(target_os = "linux")]
use std::process::{Command, Stdio};

use super::view::{MintView, NftCard, gallery_view, mint_view};
use super::{App, AppMessage, View, WalletStatus};
use crate::flow::{FlowState, Readiness, TxAction};

impl App {
    // ========================================================================
    // Wallet
    // ========================================================================

    /// Asks the signer for its accounts. The answer arrives as a message.
    pub(crate) fn connect_wallet(&mut self) {
        let attempt = self.wallet.begin_connect();
        tracing::info!(attempt, "connecting wallet");

        let provider = self.provider.clone();
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = provider.accounts().await.map_err(|e| e.to_string());
            // Receiver may be dropped during shutdown - safe to ignore
            let _ = message_tx.send(AppMessage::AccountsLoaded { attempt, result });
        });
    }

    /// Forgets the account and tears down every flow of the mounted view.
    pub(crate) fn disconnect_wallet(&mut self) {
        if self.flows.has_pending() {
            tracing::warn!("disconnecting with pending transactions");
        }
        self.wallet.disconnect();
        self.flows.teardown();
        self.ui.show_toast("Disconnected", 20);
    }

    pub(crate) fn toggle_connection(&mut self) {
        match self.wallet.status() {
            WalletStatus::Disconnected => self.connect_wallet(),
            WalletStatus::Connecting(_) | WalletStatus::Connected(_) => self.disconnect_wallet(),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Mounts `view`. Leaving a view tears its flows down.
    pub(crate) fn switch_view(&mut self, view: View) {
        if self.nav.set_view(view) {
            tracing::debug!(?view, "switching view");
            self.flows.teardown();
        }
    }

    pub(crate) fn card_count(&self) -> usize {
        gallery_view(&self.view_inputs()).cards().len()
    }

    /// The selected gallery card, if the gallery is mounted and loaded.
    #[must_use]
    pub fn selected_card(&self) -> Option<NftCard> {
        if self.nav.view() != View::Gallery {
            return None;
        }
        let gallery = gallery_view(&self.view_inputs());
        let cards = gallery.cards();
        self.nav
            .selected_card(cards.len())
            .and_then(|index| cards.get(index).map(|card| (*card).clone()))
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    pub(crate) fn mint(&mut self) {
        if self.nav.view() != View::Minter {
            self.ui.show_toast("Switch to the Minter to mint", 20);
            return;
        }
        self.execute_action(TxAction::Mint);
    }

    /// Mint on the Minter, the selected card's action on the Gallery.
    pub(crate) fn execute_selected(&mut self) {
        match self.nav.view() {
            View::Minter => self.execute_action(TxAction::Mint),
            View::Gallery => match self.selected_card() {
                Some(card) => self.execute_action(card.action.action),
                None => self.ui.show_toast("No NFT selected", 20),
            },
        }
    }

    fn execute_action(&mut self, action: TxAction) {
        if self.wallet.account().is_none() {
            self.ui.show_toast("[x] Connect your wallet first", 20);
            return;
        }

        let effects = self.flows.execute(action);
        if effects.is_empty() {
            let reason = match self.flows.get(&action).map(|flow| flow.state()) {
                Some(FlowState::Pending(_)) => {
                    format!("{} already pending", action.label())
                }
                Some(FlowState::Idle(readiness)) => match readiness {
                    Readiness::NotReady(reason) => reason.clone(),
                    Readiness::Simulating => "Still checking...".to_string(),
                    Readiness::Rejected(error) => error.to_string(),
                },
                _ => format!("{} is not available", action.label()),
            };
            tracing::debug!(?action, %reason, "execute ignored");
            self.ui.show_toast(reason, 20);
            return;
        }
        self.run_effects(effects);
    }

    /// Refetches every cached read and re-simulates idle actions.
    pub(crate) fn refresh(&mut self) {
        tracing::info!("refreshing contract data");
        for ticket in self.data.invalidate_all() {
            self.spawn_fetch(ticket);
        }
        let effects = self.flows.resimulate_all();
        self.run_effects(effects);
        self.ui.show_toast("Refreshing...", 10);
    }

    // ========================================================================
    // Browser
    // ========================================================================

    /// Image of the next mint on the Minter, of the selected card on the Gallery.
    pub(crate) fn image_url(&self) -> Option<String> {
        match self.nav.view() {
            View::Minter => match mint_view(&self.view_inputs()) {
                MintView::Available { image_url, .. } => Some(image_url),
                _ => None,
            },
            View::Gallery => self.selected_card().map(|card| card.image_url),
        }
    }

    pub(crate) fn open_image(&mut self) {
        match self.image_url() {
            Some(url) => self.open_url(&url),
            None => self.ui.show_toast("[x] No image to open", 20),
        }
    }

    /// Hash of the most recent transaction of the focused action.
    #[must_use]
    pub fn last_tx_hash(&self) -> Option<TxHash> {
        let action = match self.nav.view() {
            View::Minter => TxAction::Mint,
            View::Gallery => self.selected_card()?.action.action,
        };
        self.flows.get(&action).and_then(|flow| flow.latest_hash())
    }

    pub(crate) fn open_explorer(&mut self) {
        let Some(hash) = self.last_tx_hash() else {
            self.ui.show_toast("[x] No transaction yet", 20);
            return;
        };
        match self.config.network.explorer_link(&hash) {
            Some(url) => self.open_url(&url),
            None => self.ui.show_toast("[x] Explorer link unavailable", 20),
        }
    }

    fn open_url(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => self.ui.show_toast("[+] Opened in browser", 20),
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to open browser");
                self.ui.show_toast(format!("[x] Failed to open browser: {e}"), 30);
            }
        }
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    pub(crate) fn copy_tx_hash(&mut self) {
        let Some(hash) = self.last_tx_hash() else {
            self.ui.show_toast("[x] No transaction yet", 20);
            return;
        };
        let text = hash.to_string();

        #[cfg(target_os = "linux")]
        {
            if Self::try_copy_with_external_tool(&text) {
                self.ui.show_toast("[+] Transaction hash copied!", 20);
                return;
            }
        }

        match Clipboard::new() {
            Ok(mut clipboard) => {
                if clipboard.set_text(text).is_ok() {
                    self.ui.show_toast("[+] Transaction hash copied!", 20);
                } else {
                    self.ui.show_toast("[x] Failed to copy", 20);
                }
            }
            Err(_) => {
                self.ui.show_toast("[x] Clipboard not available", 20);
            }
        }
    }

    /// Copies with `wl-copy`, `xclip` or `xsel`, whichever works first.
    /// These keep the content after the app exits, unlike `arboard`.
    #[cfg(target_os = "linux")]
    fn try_copy_with_external_tool(text: &str) -> bool {
        const TOOLS: [(&str, &[&str]); 3] = [
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
        ];

        TOOLS.iter().any(|(program, args)| {
            let Ok(mut child) = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            else {
                return false;
            };
            let written = child
                .stdin
                .take()
                .is_some_and(|mut stdin| stdin.write_all(text.as_bytes()).is_ok());
            child.wait().map(|s| s.success()).unwrap_or(false) && written
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PopupState;
    use crate::state::view::ActionState;
    use crate::test_utils::{ACCOUNT, ConfigMother, MockChain, MockProvider, mock_app, settle};

    #[tokio::test]
    async fn test_connect_picks_node_account() {
        let provider = MockProvider::new(MockChain::default());
        let mut app = mock_app(&provider, ConfigMother::local());

        app.connect_wallet();
        assert!(matches!(app.wallet.status(), WalletStatus::Connecting(_)));
        settle(&mut app).await;

        assert_eq!(app.wallet.account(), Some(ACCOUNT));
    }

    #[tokio::test]
    async fn test_connect_without_accounts_shows_message() {
        let provider = MockProvider::new(MockChain::default());
        provider.set_accounts(Vec::new());
        let mut app = mock_app(&provider, ConfigMother::local());

        app.connect_wallet();
        settle(&mut app).await;

        assert_eq!(app.wallet.account(), None);
        assert!(matches!(app.ui.popup_state, PopupState::Message(_)));
    }

    #[tokio::test]
    async fn test_disconnect_while_connecting_ignores_answer() {
        let provider = MockProvider::new(MockChain::default());
        let mut app = mock_app(&provider, ConfigMother::local());

        app.connect_wallet();
        app.toggle_connection();
        settle(&mut app).await;

        assert_eq!(app.wallet.status(), WalletStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_execute_without_account_is_rejected() {
        let provider = MockProvider::new(MockChain::default());
        let mut app = mock_app(&provider, ConfigMother::local());
        app.start();
        settle(&mut app).await;

        app.execute_selected();
        settle(&mut app).await;

        assert!(provider.submitted().is_empty());
        let toast = app.ui.toast.as_ref().map(|(text, _)| text.clone());
        assert_eq!(toast.as_deref(), Some("[x] Connect your wallet first"));
    }

    #[tokio::test]
    async fn test_selected_card_follows_navigation() {
        let chain = MockChain::default().with_owned(ACCOUNT, &[0, 1]);
        let provider = MockProvider::new(chain);
        let mut app = mock_app(&provider, ConfigMother::local());
        app.start();
        app.connect_wallet();
        settle(&mut app).await;
        app.switch_view(View::Gallery);
        app.reconcile();
        settle(&mut app).await;

        assert_eq!(app.card_count(), 2);
        let first = app.selected_card().map(|card| card.token);
        app.nav.select_next(app.card_count());
        let second = app.selected_card().map(|card| card.token);

        assert_ne!(first, second);
        assert!(matches!(
            app.selected_card().map(|card| card.action.state),
            Some(ActionState::Ready)
        ));
    }

    #[tokio::test]
    async fn test_image_url_on_minter_is_next_token() {
        let chain = MockChain::default().with_owned(ACCOUNT, &[0, 1]);
        let provider = MockProvider::new(chain);
        let mut app = mock_app(&provider, ConfigMother::local());
        app.start();
        settle(&mut app).await;

        let url = app.image_url();
        assert!(url.is_some_and(|u| u.ends_with("/2.png")));
    }
}
