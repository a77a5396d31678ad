//! Help popup listing every keybinding. Toggled with `?`.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::commands::KEYBINDINGS;
use crate::theme::{ACCENT_COLOR, MUTED_COLOR};
use crate::ui::helpers::centered_popup_area;

/// Width of the key column.
const KEY_COLUMN: usize = 14;

pub fn render(frame: &mut Frame, area: Rect) {
    let height = u16::try_from(KEYBINDINGS.len()).unwrap_or(u16::MAX) + 5;
    let popup_area = centered_popup_area(area, 72, height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help (? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_COLOR));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::styled(
            "Keys",
            Style::default()
                .fg(ACCENT_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "─".repeat(inner.width.saturating_sub(2) as usize),
            Style::default().fg(MUTED_COLOR),
        ),
    ];
    lines.extend(KEYBINDINGS.iter().map(|(key, description)| {
        Line::from(vec![
            Span::styled(format!("{key:<KEY_COLUMN$}"), Style::default().fg(ACCENT_COLOR)),
            Span::raw(*description),
        ])
    }));

    frame.render_widget(Paragraph::new(lines), inner);
}
