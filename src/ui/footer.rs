//! Footer bar with the keyboard shortcuts of the mounted view.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::state::{App, View, WalletStatus};
use crate::theme::MUTED_COLOR;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let footer = Paragraph::new(hints(app))
        .style(Style::default().fg(MUTED_COLOR))
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn hints(app: &App) -> String {
    let connect = match app.wallet.status() {
        WalletStatus::Disconnected => "c:Connect",
        WalletStatus::Connecting(_) | WalletStatus::Connected(_) => "c:Disconnect",
    };
    let view_keys = match app.nav.view() {
        View::Minter => "m:Mint  o:Image  x:Explorer  y:Copy tx  Tab:Gallery",
        View::Gallery => "↑↓:Select  Enter:Action  o:Image  x:Explorer  Tab:Minter",
    };
    format!("q:Quit  {connect}  {view_keys}  r:Refresh  n:History  ?:Help")
}
