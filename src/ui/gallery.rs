//! Gallery view: owned and staked NFT cards with their actions.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::state::App;
use crate::state::view::{CardStage, GalleryView, NftCard, gallery_view};
use crate::theme::{
    ACCENT_COLOR, ERROR_COLOR, MUTED_COLOR, PRIMARY_COLOR, SELECTED_STYLE, SUCCESS_COLOR,
    WARNING_COLOR, spinner,
};

use super::helpers::{action_line, create_border_block, outcome_line};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let gallery = gallery_view(&app.view_inputs());

    let (owned, staked) = match &gallery {
        GalleryView::Loaded { owned, staked } => (owned, staked),
        other => {
            let block = create_border_block("My gallery", true);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(placeholder(other, app.animation_tick), inner);
            return;
        }
    };

    let selected = app.nav.selected_card(gallery.cards().len());
    let [owned_area, staked_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let owned_selected = selected.filter(|index| *index < owned.len());
    render_section(
        frame,
        owned_area,
        app,
        &format!("My NFTs ({})", owned.len()),
        owned,
        owned_selected,
        "You don't own any NFTs yet. Mint one on the Minter (press 1).",
    );

    match staked {
        Some(staked) => {
            let staked_selected = selected
                .and_then(|index| index.checked_sub(owned.len()))
                .filter(|index| *index < staked.len());
            render_section(
                frame,
                staked_area,
                app,
                &format!("Staked NFTs ({})", staked.len()),
                staked,
                staked_selected,
                "No staked NFTs. Approve and stake one to earn rewards.",
            );
        }
        None => {
            let block = create_border_block("Staked NFTs", false);
            let inner = block.inner(staked_area);
            frame.render_widget(block, staked_area);
            frame.render_widget(
                Paragraph::new("Staking contract not configured.")
                    .style(Style::new().fg(MUTED_COLOR))
                    .alignment(Alignment::Center),
                inner,
            );
        }
    }
}

fn placeholder(gallery: &GalleryView, tick: u64) -> Paragraph<'static> {
    let lines = match gallery {
        GalleryView::Disconnected => vec![
            Line::raw(""),
            Line::styled(
                "Please connect your account first.",
                Style::new().fg(WARNING_COLOR).add_modifier(Modifier::BOLD),
            ),
            Line::styled("Press c to connect.", Style::new().fg(MUTED_COLOR)),
        ],
        GalleryView::Failed(error) => vec![
            Line::raw(""),
            Line::styled(
                format!("[x] Could not load your NFTs: {error}"),
                Style::new().fg(ERROR_COLOR),
            ),
            Line::styled("Press r to retry", Style::new().fg(MUTED_COLOR)),
        ],
        GalleryView::Loading | GalleryView::Loaded { .. } => vec![
            Line::raw(""),
            Line::from(format!("{} Loading your NFTs...", spinner(tick))),
        ],
    };
    Paragraph::new(lines).alignment(Alignment::Center)
}

fn render_section(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    cards: &[NftCard],
    selected: Option<usize>,
    empty_message: &'static str,
) {
    let block = create_border_block(title, selected.is_some());

    if cards.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(empty_message)
                .style(Style::new().fg(MUTED_COLOR))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = cards.iter().map(|card| card_item(card, app)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(SELECTED_STYLE)
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(card: &NftCard, app: &App) -> ListItem<'static> {
    let (stage, color) = match card.stage {
        CardStage::CheckingApproval => ("checking approval", MUTED_COLOR),
        CardStage::NeedsApproval => ("needs approval", WARNING_COLOR),
        CardStage::ReadyToStake => ("ready to stake", SUCCESS_COLOR),
        CardStage::Staked => ("staked", ACCENT_COLOR),
    };

    let mut title = vec![
        Span::styled(
            format!("NFT {}", card.token),
            Style::new().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {stage}"), Style::new().fg(color)),
    ];
    if card.stage == CardStage::Staked {
        let rewards = card.rewards.as_deref().unwrap_or("…");
        title.push(Span::styled(
            format!("  rewards: {rewards} {}", app.config.token_symbol),
            Style::new().fg(ACCENT_COLOR),
        ));
    }

    let mut lines = vec![
        Line::from(title),
        Line::styled(format!("  {}", card.image_url), Style::new().fg(MUTED_COLOR)),
        Line::from(
            [Span::raw("  ")]
                .into_iter()
                .chain(action_line(&card.action, "Enter", app.animation_tick).spans)
                .collect::<Vec<_>>(),
        ),
    ];
    if let Some(outcome) = outcome_line(&card.action) {
        lines.push(Line::from(
            [Span::raw("  ")]
                .into_iter()
                .chain(outcome.spans)
                .collect::<Vec<_>>(),
        ));
    }
    lines.push(Line::raw(""));
    ListItem::new(lines)
}

// ============================================================================
// Tests
// ============================================================================
