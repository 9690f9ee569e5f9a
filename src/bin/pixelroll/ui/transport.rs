//! Transport bar widget - shows play state, position, song length, speed and
//! randomization

use pixelroll::timeline::RandomMode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Snapshot of player state for one draw
pub struct TransportInfo {
    pub is_playing: bool,
    pub elapsed_sec: f64,
    /// End of the last note
    pub total_sec: f64,
    pub speed: f64,
    pub random: RandomMode,
    pub note_count: usize,
    /// Surface size in pixels
    pub resolution: (u32, u32),
    pub clock: &'static str,
}

fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor();
    format!("{:02}:{:04.1}", minutes as u32, seconds - minutes * 60.0)
}

fn format_position(elapsed: f64, total: f64) -> String {
    format!("{} / {}", format_time(elapsed), format_time(total))
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, info: &TransportInfo) {
    let block = Block::default().title(" pixelroll ").borders(Borders::ALL);

    let play_symbol = if info.is_playing { "▶" } else { "■" };
    let play_state_str = if info.is_playing { "Playing" } else { "Stopped" };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            Style::default().fg(if info.is_playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("{}  ", format_position(info.elapsed_sec, info.total_sec)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Speed: {:.0} px/s  ", info.speed),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Random: {}  ", info.random),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("{} notes  ", info.note_count),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "{}x{} px  {} clock",
                info.resolution.0, info.resolution.1, info.clock
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_tenths() {
        assert_eq!(format_time(0.0), "00:00.0");
        assert_eq!(format_time(-3.0), "00:00.0");
        assert_eq!(format_time(75.3), "01:15.3");
    }

    #[test]
    fn position_shows_song_length() {
        assert_eq!(format_position(1.5, 125.0), "00:01.5 / 02:05.0");
    }
}
