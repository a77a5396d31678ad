//! UI state management: popups, toasts and the notification history.
//!
//! Every transaction notification passes through [`UiState::notify`]: it is
//! logged, shown as a toast and kept in a bounded history.

use std::collections::VecDeque;

use crate::flow::{Notification, Severity};

/// Ticks (100 ms each) a toast stays on screen.
pub const TOAST_TICKS: u8 = 40;

/// Number of notifications kept for the history.
const HISTORY_LEN: usize = 50;

// ============================================================================
// Popup State
// ============================================================================

/// Modal shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    /// An error or informational message that needs acknowledging.
    Message(String),
    /// Keybinding reference.
    Help,
    /// Past transaction notifications.
    History,
}

// ============================================================================
// UI State
// ============================================================================

#[derive(Debug, Default)]
pub struct UiState {
    /// Current popup/modal state.
    pub popup_state: PopupState,
    /// Toast notification message and remaining ticks (non-blocking overlay).
    pub toast: Option<(String, u8)>,
    /// Most recent notifications, newest last.
    notifications: VecDeque<Notification>,
}

impl UiState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Popup Management
    // ========================================================================

    pub fn dismiss_popup(&mut self) {
        self.popup_state = PopupState::None;
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.popup_state = PopupState::Message(message.into());
    }

    pub fn toggle_help(&mut self) {
        self.popup_state = match self.popup_state {
            PopupState::Help => PopupState::None,
            _ => PopupState::Help,
        };
    }

    pub fn toggle_history(&mut self) {
        self.popup_state = match self.popup_state {
            PopupState::History => PopupState::None,
            _ => PopupState::History,
        };
    }

    // ========================================================================
    // Toast Notifications
    // ========================================================================

    /// Shows a toast notification (non-blocking overlay that auto-dismisses).
    ///
    /// Duration is in ticks (each tick is ~100ms in the main loop).
    pub fn show_toast(&mut self, message: impl Into<String>, ticks: u8) {
        self.toast = Some((message.into(), ticks));
    }

    /// Decrements the toast countdown.
    ///
    /// Returns `true` if the toast was removed (countdown reached zero).
    pub fn tick_toast(&mut self) -> bool {
        if let Some((_, ref mut ticks)) = self.toast {
            if *ticks > 1 {
                *ticks -= 1;
                false
            } else {
                self.toast = None;
                true
            }
        } else {
            false
        }
    }

    /// Delivers a notification: toast, history entry and log event.
    pub fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::warn!(message = %notification.message, "notification"),
            Severity::Success => {
                tracing::info!(message = %notification.message, "notification");
            }
        }
        self.show_toast(notification.display_text(), TOAST_TICKS);
        if self.notifications.len() == HISTORY_LEN {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    /// Notifications delivered so far, oldest first.
    pub fn notifications(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.notifications.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
