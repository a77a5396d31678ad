//! Notification history popup. Toggled with `n`.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::flow::{Notification, Severity};
use crate::theme::{ERROR_COLOR, MUTED_COLOR, SUCCESS_COLOR};
use crate::ui::helpers::{centered_popup_area, create_popup_block};

/// Renders the most recent notifications, newest first.
pub fn render<'a>(
    frame: &mut Frame,
    area: Rect,
    notifications: impl DoubleEndedIterator<Item = &'a Notification>,
) {
    let popup_area = centered_popup_area(area, 72, area.height.saturating_sub(4).max(6));
    let block = create_popup_block("Notifications (n to close)");
    let inner = block.inner(popup_area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = notifications
        .rev()
        .take(inner.height as usize)
        .map(|notification| {
            let (marker, color) = match notification.severity {
                Severity::Success => ("[+] ", SUCCESS_COLOR),
                Severity::Error => ("[x] ", ERROR_COLOR),
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(color)),
                Span::raw(notification.message.clone()),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::styled(
            "No transactions yet",
            Style::default().fg(MUTED_COLOR),
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_history_lists_newest_first() {
        let history = [
            Notification::success("Successfully minted your NFT!"),
            Notification::error("Stake #3 failed: boom"),
        ];
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).expect("terminal");
        terminal
            .draw(|frame| render(frame, frame.area(), history.iter()))
            .expect("draw");

        let screen = screen(&terminal);
        let minted = screen.find("minted your NFT").expect("success entry");
        let failed = screen.find("Stake #3 failed").expect("error entry");
        assert!(failed < minted);
    }

    #[test]
    fn test_empty_history_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal
            .draw(|frame| render(frame, frame.area(), std::iter::empty()))
            .expect("draw");
        assert!(screen(&terminal).contains("No transactions yet"));
    }
}
