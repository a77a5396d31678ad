//! Colors and styles shared by every view.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Color Constants
// ============================================================================

/// Focused elements, the active tab and titles.
pub const PRIMARY_COLOR: Color = Color::Cyan;

pub const SUCCESS_COLOR: Color = Color::Green;

pub const WARNING_COLOR: Color = Color::Yellow;

pub const ERROR_COLOR: Color = Color::Red;

pub const MUTED_COLOR: Color = Color::Gray;

/// Token amounts and the help popup border.
pub const ACCENT_COLOR: Color = Color::Magenta;

// ============================================================================
// Style Constants
// ============================================================================

pub const BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const FOCUSED_BORDER_STYLE: Style = Style::new().fg(PRIMARY_COLOR);

pub const FOCUSED_TITLE_STYLE: Style = Style::new().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD);

/// Selected card.
pub const SELECTED_STYLE: Style = Style::new().bg(Color::DarkGray);

/// Active tab and enabled action buttons.
pub const HIGHLIGHT_STYLE: Style = Style::new()
    .fg(PRIMARY_COLOR)
    .add_modifier(Modifier::BOLD);

// ============================================================================
// Spinner
// ============================================================================

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner frame for an animation tick.
#[must_use]
pub fn spinner(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}
