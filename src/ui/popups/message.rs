//! Message popup for errors that need acknowledging, such as a failed
//! wallet connection.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::theme::MUTED_COLOR;
use crate::ui::helpers::{centered_popup_area, create_popup_block};

/// Renders `message` in a popup sized to its content.
pub fn render(frame: &mut Frame, area: Rect, message: &str) {
    let message_lines = u16::try_from(message.lines().count().max(1)).unwrap_or(u16::MAX);
    let longest_line = message
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let longest_line = u16::try_from(longest_line).unwrap_or(u16::MAX);

    let popup_width = 40
        .max(longest_line.saturating_add(6))
        .min(area.width * 8 / 10);
    let popup_height = 6.max(message_lines.saturating_add(4));
    let popup_area = centered_popup_area(area, popup_width, popup_height);

    let block = create_popup_block("Message");
    let inner = block.inner(popup_area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    if inner.height < 2 {
        return;
    }

    let message_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 2);
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        message_area,
    );

    let separator_area = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 1);
    frame.render_widget(
        Paragraph::new("─".repeat(inner.width as usize)).style(Style::default().fg(Color::DarkGray)),
        separator_area,
    );

    let help_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    frame.render_widget(
        Paragraph::new("Esc:Close  Enter:Close")
            .style(Style::default().fg(MUTED_COLOR))
            .alignment(Alignment::Center),
        help_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use rstest::rstest;

    #[rstest]
    #[case::short("Short")]
    #[case::multiline("Line 1\nLine 2\nLine 3")]
    #[case::empty("")]
    #[case::long(
        "Could not connect: Account 0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb is not managed by the node"
    )]
    fn test_message_popup_renders(#[case] message: &str) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal
            .draw(|frame| render(frame, frame.area(), message))
            .expect("draw");
        assert!(!terminal.backend().buffer().area().is_empty());
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(8, 4)).expect("terminal");
        terminal
            .draw(|frame| render(frame, frame.area(), "hello"))
            .expect("draw");
    }
}
