//! Toast overlay for transaction and wallet notifications.
//!
//! Appears in the bottom-right corner above the footer and never takes
//! focus. The color follows the notification prefix.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::border,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::theme::{ERROR_COLOR, SUCCESS_COLOR, WARNING_COLOR};

const MIN_TOAST_WIDTH: u16 = 20;
const TOAST_HEIGHT: u16 = 3;
const TOAST_MARGIN_RIGHT: u16 = 2;
const TOAST_MARGIN_BOTTOM: u16 = 2;

pub fn render_toast(frame: &mut Frame, area: Rect, message: &str) {
    let toast_area = toast_area(area, message);
    if toast_area.is_empty() {
        return;
    }

    let color = toast_color(message);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(color));
    let inner = block.inner(toast_area);

    frame.render_widget(Clear, toast_area);
    frame.render_widget(block, toast_area);
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        inner,
    );
}

fn toast_area(area: Rect, message: &str) -> Rect {
    let text_width = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = text_width
        .saturating_add(4)
        .max(MIN_TOAST_WIDTH)
        .min(area.width.saturating_sub(TOAST_MARGIN_RIGHT));
    let height = TOAST_HEIGHT.min(area.height);

    let x = area.x + area.width.saturating_sub(width + TOAST_MARGIN_RIGHT);
    let y = area.y + area.height.saturating_sub(height + TOAST_MARGIN_BOTTOM);
    Rect::new(x, y, width, height)
}

fn toast_color(message: &str) -> Color {
    if message.starts_with("[+]") {
        SUCCESS_COLOR
    } else if message.starts_with("[x]") {
        ERROR_COLOR
    } else if message.starts_with("[!]") {
        WARNING_COLOR
    } else {
        Color::White
    }
}
