//! Rendering entry point: header, the mounted view, footer and overlays.

pub mod components;
pub mod footer;
pub mod gallery;
pub mod header;
pub mod helpers;
pub mod minter;
pub mod popups;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::state::{App, PopupState, View};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Draws one frame. Popups sit above the view and the toast above everything.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let [header_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(area);

    header::render(frame, header_area, app);
    match app.nav.view() {
        View::Minter => minter::render(frame, content_area, app),
        View::Gallery => gallery::render(frame, content_area, app),
    }
    footer::render(frame, footer_area, app);

    match &app.ui.popup_state {
        PopupState::Message(message) => popups::message::render(frame, area, message),
        PopupState::Help => popups::help::render(frame, area),
        PopupState::History => popups::history::render(frame, area, app.ui.notifications()),
        PopupState::None => {}
    }

    if let Some((message, _)) = &app.ui.toast {
        components::render_toast(frame, area, message);
    }
}
