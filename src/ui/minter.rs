//! Minter view: next token, price and the mint button.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::state::App;
use crate::state::view::{MintView, mint_view};
use crate::theme::{ERROR_COLOR, MUTED_COLOR, PRIMARY_COLOR, SUCCESS_COLOR, WARNING_COLOR, spinner};

use super::helpers::{action_line, create_border_block, outcome_line};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = create_border_block("Minter", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match mint_view(&app.view_inputs()) {
        MintView::Loading => vec![
            Line::raw(""),
            Line::from(format!("{} Loading collection...", spinner(app.animation_tick))),
        ],
        MintView::Failed(error) => vec![
            Line::raw(""),
            Line::styled(
                format!("[x] Could not read the total supply: {error}"),
                Style::new().fg(ERROR_COLOR),
            ),
            Line::styled("Press r to retry", Style::new().fg(MUTED_COLOR)),
        ],
        MintView::OutOfStock => vec![
            Line::raw(""),
            Line::styled(
                "Out of stock",
                Style::new().fg(WARNING_COLOR).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!("All {} NFTs have been minted.", app.config.max_supply),
                Style::new().fg(MUTED_COLOR),
            ),
        ],
        MintView::Available {
            next_id,
            image_url,
            price,
            action,
        } => {
            let mut lines = vec![
                Line::raw(""),
                field("Next NFT", next_id.to_string()),
                field("Image", image_url),
                field(
                    "Price",
                    format!("{price} {}", app.config.network.currency()),
                ),
                Line::raw(""),
                action_line(&action, "m", app.animation_tick),
            ];
            if let Some(outcome) = outcome_line(&action) {
                lines.push(Line::raw(""));
                lines.push(outcome);
            }
            if let Some(hash) = action.confirmed {
                if let Some(link) = app.config.network.explorer_link(&hash) {
                    lines.push(Line::styled(link, Style::new().fg(MUTED_COLOR)));
                }
                lines.push(Line::styled(
                    "Your NFT is waiting in My gallery (press 2).",
                    Style::new().fg(SUCCESS_COLOR),
                ));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::new().fg(MUTED_COLOR)),
        Span::styled(value, Style::new().fg(PRIMARY_COLOR)),
    ])
}

// ============================================================================
// Tests
// ============================================================================
