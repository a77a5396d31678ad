//! Header bar: app name, view tabs, token balance, account and network.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::view::token_balance;
use crate::state::wallet::short_address;
use crate::state::{App, View, WalletStatus};
use crate::theme::{
    ACCENT_COLOR, FOCUSED_TITLE_STYLE, HIGHLIGHT_STYLE, MUTED_COLOR, SUCCESS_COLOR, WARNING_COLOR,
    spinner,
};

use super::helpers::create_border_block;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = create_border_block("", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let status = status_line(app);
    let status_width = u16::try_from(status.width()).unwrap_or(u16::MAX);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(inner);

    frame.render_widget(Paragraph::new(title_line(app)), left);
    frame.render_widget(Paragraph::new(status), right);
}

fn title_line(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!(" {} ", app.config.app_name), FOCUSED_TITLE_STYLE),
        Span::raw(" "),
    ];
    for view in View::ALL {
        let label = format!(" {} {} ", view.index() + 1, view.title());
        let style = if view == app.nav.view() {
            HIGHLIGHT_STYLE.add_modifier(Modifier::REVERSED)
        } else {
            Style::new().fg(MUTED_COLOR)
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn status_line(app: &App) -> Line<'static> {
    let separator = || Span::styled(" │ ", Style::new().fg(Color::DarkGray));
    let mut spans = Vec::new();

    if let Some(balance) = token_balance(&app.view_inputs()) {
        spans.push(Span::styled(
            format!("{balance} {}", app.config.token_symbol),
            Style::new().fg(ACCENT_COLOR),
        ));
        spans.push(separator());
    }

    spans.push(match app.wallet.status() {
        WalletStatus::Connected(account) => {
            Span::styled(short_address(&account), Style::new().fg(SUCCESS_COLOR))
        }
        WalletStatus::Connecting(_) => Span::styled(
            format!("{} connecting", spinner(app.animation_tick)),
            Style::new().fg(WARNING_COLOR),
        ),
        WalletStatus::Disconnected => Span::styled("not connected", Style::new().fg(MUTED_COLOR)),
    });
    spans.push(separator());

    spans.push(Span::styled(
        format!("{} ", app.config.network.name()),
        Style::new().fg(SUCCESS_COLOR).add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

// ============================================================================
// Tests
// ============================================================================
