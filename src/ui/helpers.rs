//! Styled blocks, popup placement and action buttons shared by the views.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::state::view::{ActionState, ActionView};
use crate::theme::{
    BORDER_STYLE, ERROR_COLOR, FOCUSED_BORDER_STYLE, FOCUSED_TITLE_STYLE, HIGHLIGHT_STYLE,
    MUTED_COLOR, SUCCESS_COLOR, WARNING_COLOR, spinner,
};

// ============================================================================
// Blocks
// ============================================================================

/// Bordered block styled by focus state.
#[must_use]
pub fn create_border_block(title: &str, focused: bool) -> Block<'static> {
    let display_title = if title.is_empty() {
        String::new()
    } else if focused {
        format!(" ● {title} ")
    } else {
        format!(" {title} ")
    };

    let (border_style, border_set, title_style) = if focused {
        (FOCUSED_BORDER_STYLE, border::DOUBLE, FOCUSED_TITLE_STYLE)
    } else {
        (
            BORDER_STYLE,
            border::ROUNDED,
            Style::new()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    };

    Block::default()
        .borders(Borders::ALL)
        .title(display_title)
        .title_style(title_style)
        .border_set(border_set)
        .border_style(border_style)
}

/// Block with a centered title, for popups.
#[must_use]
pub fn create_popup_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(BORDER_STYLE)
}

/// A `width` x `height` rectangle centered in `parent`, keeping a margin of two cells.
#[must_use]
pub fn centered_popup_area(parent: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(parent.width.saturating_sub(4));
    let popup_height = height.min(parent.height.saturating_sub(4));

    let popup_x = parent.x + (parent.width.saturating_sub(popup_width)) / 2;
    let popup_y = parent.y + (parent.height.saturating_sub(popup_height)) / 2;

    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

// ============================================================================
// Action Buttons
// ============================================================================

/// One line describing what an action's button shows.
///
/// `key` is the key hint printed next to an enabled button.
#[must_use]
pub fn action_line(action: &ActionView, key: &str, tick: u64) -> Line<'static> {
    let label = action.action.label();
    match &action.state {
        ActionState::ConnectWallet => Line::from(vec![
            Span::styled("[ Connect wallet ]", Style::new().fg(WARNING_COLOR)),
            Span::styled("  press c", Style::new().fg(MUTED_COLOR)),
        ]),
        ActionState::Unavailable(reason) => Line::from(vec![
            Span::styled(format!("[ {label} ]"), Style::new().fg(Color::DarkGray)),
            Span::styled(format!("  {reason}"), Style::new().fg(MUTED_COLOR)),
        ]),
        ActionState::Checking => Line::from(vec![
            Span::styled(format!("[ {label} ]"), Style::new().fg(Color::DarkGray)),
            Span::styled(
                format!("  {} checking", spinner(tick)),
                Style::new().fg(MUTED_COLOR),
            ),
        ]),
        ActionState::Ready => Line::from(vec![
            Span::styled(format!("[ {label} ]"), HIGHLIGHT_STYLE),
            Span::styled(format!("  press {key}"), Style::new().fg(MUTED_COLOR)),
        ]),
        ActionState::Pending(hash) => {
            let detail = match hash {
                Some(hash) => format!("waiting for confirmation of {}", short_hash(hash)),
                None => "submitting".to_string(),
            };
            Line::from(vec![Span::styled(
                format!("{} {label}: {detail}", spinner(tick)),
                Style::new().fg(WARNING_COLOR),
            )])
        }
    }
}

/// Outcome of the last invocation, if any.
#[must_use]
pub fn outcome_line(action: &ActionView) -> Option<Line<'static>> {
    if let Some(hash) = &action.confirmed {
        return Some(Line::from(Span::styled(
            format!("[+] Confirmed in {}", short_hash(hash)),
            Style::new().fg(SUCCESS_COLOR),
        )));
    }
    action.last_error.as_ref().map(|error| {
        Line::from(Span::styled(
            format!("[x] {error}"),
            Style::new().fg(ERROR_COLOR),
        ))
    })
}

/// Shortens a transaction hash for display: `0x1234abcd…9876`.
#[must_use]
pub fn short_hash(hash: &alloy_primitives::TxHash) -> String {
    let full = hash.to_string();
    format!("{}…{}", &full[..10], &full[full.len() - 4..])
}

// ============================================================================
// Tests
// ============================================================================
