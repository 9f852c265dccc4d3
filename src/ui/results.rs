use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::create_titled_block;
use crate::app::{App, CloudState, SongView};
use crate::cloud::palette::magma;
use crate::constants::ui::{LYRICS_PANE_PERCENT, TOP_WORDS_SHOWN};
use crate::lyrics::LyricsProvider;

/// Widest frequency bar in cells.
const BAR_WIDTH: usize = 20;

/// Draw lyrics on the left and the cloud summary on the right.
pub fn draw_results<P: LyricsProvider + Clone + 'static>(f: &mut Frame, app: &App<P>, area: Rect) {
    let Some(view) = &app.current else {
        f.render_widget(
            Paragraph::new(" Nothing to show yet. Press / to search.").block(create_titled_block("Results", false)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LYRICS_PANE_PERCENT),
            Constraint::Percentage(100 - LYRICS_PANE_PERCENT),
        ])
        .split(area);

    draw_lyrics(f, view, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(chunks[1]);

    draw_cloud_status(f, app, view, side[0]);
    draw_top_words(f, view, side[1]);
}

fn draw_lyrics(f: &mut Frame, view: &SongView, area: Rect) {
    let title = format!("{} ({} lines)", view.title, view.lyrics.lines().count());
    let lines: Vec<Line> = view.lyrics.lines().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .block(create_titled_block(&title, true))
        .scroll((view.scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_cloud_status<P: LyricsProvider + Clone + 'static>(f: &mut Frame, app: &App<P>, view: &SongView, area: Rect) {
    let lines = match &view.cloud {
        CloudState::Pending => vec![Line::from(Span::styled(
            "Drawing...",
            Style::default().fg(Color::Yellow),
        ))],
        CloudState::Ready(cloud) => vec![
            Line::from(vec![
                Span::styled(format!("{}x{} PNG", cloud.width, cloud.height), Style::default().fg(Color::Green)),
                Span::raw(format!(", {} of {} words placed", cloud.placed, cloud.ranked.len())),
            ]),
            Line::from(vec![
                Span::styled("s", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" saves to {}", app.config.output_dir.display())),
            ]),
        ],
        CloudState::Failed(message) => vec![Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(create_titled_block("Word cloud", false))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_top_words(f: &mut Frame, view: &SongView, area: Rect) {
    let CloudState::Ready(cloud) = &view.cloud else {
        f.render_widget(create_titled_block("Top words", false), area);
        return;
    };

    let shown = &cloud.ranked[..cloud.ranked.len().min(TOP_WORDS_SHOWN)];
    let top = shown.first().map_or(1, |w| w.count.max(1));
    let word_width = shown.iter().map(|w| w.word.chars().count()).max().unwrap_or(0);

    let items: Vec<ListItem> = shown
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            let bar = (entry.count * BAR_WIDTH).div_ceil(top);
            // Darkest magma is near black; stay in the readable range
            let shade = magma(0.6f64.mul_add(1.0 - rank as f64 / shown.len() as f64, 0.25));
            let color = Color::Rgb(shade[0], shade[1], shade[2]);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<word_width$} ", entry.word), Style::default().fg(Color::White)),
                Span::styled("█".repeat(bar), Style::default().fg(color)),
                Span::styled(format!(" {}", entry.count), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(create_titled_block("Top words", false)), area);
}
