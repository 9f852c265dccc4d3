use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::create_titled_block;
use crate::app::App;
use crate::lyrics::LyricsProvider;

const TITLE: &str = "lyricloud";
const TAGLINE: &str = "Song lyrics as a word cloud";

/// Draw the title entry screen.
pub fn draw_search<P: LyricsProvider + Clone + 'static>(f: &mut Frame, app: &App<P>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(3), // heading
            Constraint::Length(3), // input
            Constraint::Length(2), // hint
            Constraint::Min(0),
        ])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE, Style::default().fg(Color::Yellow))),
    ])
    .alignment(Alignment::Center);
    f.render_widget(heading, rows[1]);

    let input_area = centered_columns(rows[2], 60);
    let block = create_titled_block("Song title", !app.is_loading());
    let inner = block.inner(input_area);
    f.render_widget(Paragraph::new(format!(" {}", app.input)).block(block), input_area);

    if !app.is_loading() {
        let cursor = u16::try_from(app.input.width() + 1).unwrap_or(u16::MAX);
        f.set_cursor((inner.x + cursor).min(inner.right().saturating_sub(1)), inner.y);
    }

    let mut hint = vec![
        Span::styled("Searching songs by ", Style::default().fg(Color::Gray)),
        Span::styled(app.default_artist().to_string(), Style::default().fg(Color::Cyan)),
    ];
    if !app.config.has_genius_credentials() {
        hint.push(Span::styled(
            "  (GENIUS_API_KEY not set)",
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(hint)).alignment(Alignment::Center), rows[3]);
}

/// Middle `percent` of a row.
fn centered_columns(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Percentage(side),
        ])
        .split(area)[1]
}
