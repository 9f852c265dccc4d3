//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod results;
mod search;

pub use results::draw_results;
pub use search::draw_search;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppMode};
use crate::lyrics::LyricsProvider;

/// Render the full application UI to the terminal frame.
pub fn draw<P: LyricsProvider + Clone + 'static>(f: &mut Frame, app: &App<P>) {
    // Create the base layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3), // Command/status bar at bottom
        ])
        .split(f.size());

    match app.mode {
        AppMode::Search => draw_search(f, app, chunks[0]),
        AppMode::Results => draw_results(f, app, chunks[0]),
    }

    draw_command_bar(f, app, chunks[1]);

    if let Some(stage) = app.loading {
        draw_loading_indicator(f, stage.label());
    }

    // Draw status/info modal (blocking)
    if let Some(status) = &app.status_message {
        draw_status_message(f, status);
        return;
    }
    // Draw error message if present (blocking)
    if let Some(error) = &app.error_message {
        draw_error_message(f, error);
        return;
    }

    if app.show_help {
        draw_help_modal(f, app.mode);
    }
}

fn draw_command_bar<P: LyricsProvider + Clone + 'static>(f: &mut Frame, app: &App<P>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled("Commands/Status", Style::default().fg(Color::Yellow)));

    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1) // Add a margin of 1 to account for the border
        .split(area)[0];

    let help_text = match app.mode {
        AppMode::Search => {
            let mut hints = vec![("Enter", "Search"), ("Ctrl+U", "Clear"), ("F1", "Help"), ("Ctrl+C", "Quit")];
            if app.current.is_some() {
                hints.insert(1, ("Esc", "Back to results"));
            }
            create_help_text(&hints)
        }
        AppMode::Results => create_help_text(&[
            ("/", "New search"),
            ("↑/↓", "Scroll"),
            ("s", "Save PNG"),
            ("y", "Copy lyrics"),
            ("?", "Help"),
            ("q", "Quit"),
        ]),
    };

    let status_bar = Paragraph::new(Line::from(help_text)).style(Style::default().fg(Color::Gray));
    f.render_widget(status_bar, inner_area);
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));

        if i < commands.len() - 1 {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let title_style = if is_focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// A rectangle of at most `width` x `height` centered in `outer`.
fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

fn draw_loading_indicator(f: &mut Frame, label: &str) {
    use unicode_width::UnicodeWidthStr;
    let width = u16::try_from(label.width() + 6).unwrap_or(u16::MAX);
    let area = centered(f.size(), width, 3);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(label)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);

    f.render_widget(Clear, area); // Clear the area first
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    f.render_widget(text, inner_area);
}

fn draw_error_message(f: &mut Frame, message: &str) {
    let size = f.size();
    let area = centered(size, 60.min(size.width.saturating_sub(4)), 7);

    let block = Block::default()
        .title(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Space for a "Press Esc to dismiss" hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press Esc to dismiss")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

fn draw_status_message(f: &mut Frame, message: &str) {
    use unicode_width::UnicodeWidthStr;
    let size = f.size();

    // Calculate box width (max 80% of screen, min 40)
    let max_width = (usize::from(size.width) * 80) / 100;
    let width = message.width().saturating_add(6).min(max_width).max(40);
    let width = u16::try_from(width).unwrap_or(size.width);

    // Calculate how many lines the message will need when wrapped
    let inner_width = usize::from(width.saturating_sub(4)).max(1);
    let msg_lines = message.width().div_ceil(inner_width);
    let height = u16::try_from(msg_lines + 4).unwrap_or(u16::MAX);
    let area = centered(size, width, height);

    let block = Block::default()
        .title(Span::styled("Info", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // message (flexible)
            Constraint::Length(1), // hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press any key to continue")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

fn draw_help_modal(f: &mut Frame, mode: AppMode) {
    let size = f.size();
    let area = centered(size, 56.min(size.width.saturating_sub(4)), 20.min(size.height.saturating_sub(4)));

    let block = Block::default()
        .title(Span::styled(
            " Help - Keybindings ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    let help_text: Vec<Line> = build_help_content(mode)
        .into_iter()
        .map(|(key, desc, is_header)| {
            if is_header {
                Line::from(vec![Span::styled(
                    key,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )])
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{key:>12}"),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: true }), inner_area);
}

fn build_help_content(mode: AppMode) -> Vec<(&'static str, &'static str, bool)> {
    let mut lines = vec![
        ("── Global ──", "", true),
        ("F1", "Show this help", false),
        ("Ctrl+C", "Quit application", false),
        ("Esc", "Dismiss message", false),
        ("", "", false),
    ];

    match mode {
        AppMode::Search => {
            lines.extend([
                ("── Search ──", "", true),
                ("Type", "Enter a song title", false),
                ("Enter", "Fetch lyrics and draw cloud", false),
                ("Backspace", "Delete a character", false),
                ("Ctrl+U", "Clear the title", false),
                ("Esc / Tab", "Back to last result", false),
            ]);
        }
        AppMode::Results => {
            lines.extend([
                ("── Results ──", "", true),
                ("↑/↓ or j/k", "Scroll lyrics", false),
                ("PgUp/PgDn", "Scroll a page", false),
                ("Home / g", "Back to top", false),
                ("s", "Save word cloud PNG", false),
                ("y", "Copy lyrics", false),
                ("/ or Esc", "New search", false),
                ("q", "Quit application", false),
            ]);
        }
    }

    lines.push(("", "", false));
    lines.push(("Press Esc or F1 to close", "", true));

    lines
}
