//! TUI module for pixelroll
//!
//! Transport bar on top, the piano roll in the middle, key help below.

mod roll;
mod transport;

use pixelroll::raster::Raster;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use roll::RollView;
pub use transport::TransportInfo;

use transport::render_transport;

/// Screen areas: transport bar, roll frame, help bar
fn layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(4),    // Roll
            Constraint::Length(1), // Help bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn roll_block() -> Block<'static> {
    Block::default().title(" Roll ").borders(Borders::ALL)
}

/// Cells available to the roll inside a terminal of `area`
pub fn roll_area(area: Rect) -> Rect {
    roll_block().inner(layout(area)[1])
}

/// Draw the whole screen
pub fn render(frame: &mut Frame, info: &TransportInfo, surface: &Raster) {
    let [transport, roll, help_bar] = layout(frame.area());

    render_transport(frame, transport, info);

    let block = roll_block();
    let inner = block.inner(roll);
    frame.render_widget(block, roll);
    frame.render_widget(RollView::new(surface), inner);

    let help = Paragraph::new(" [Space] Play/Stop  [S] Speed  [R] Random  [Q] Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_bar);
}
