//! `lyricloud` - fetch song lyrics and draw them as a word cloud.

use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{io, panic, time::Duration};

use lyricloud::app::{App, AppMode};
use lyricloud::error::Result;
use lyricloud::{logging, ui};

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::init_file_logging();

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            DisableBracketedPaste,
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // App::new() loads its own config internally
    let app = App::new();
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = res {
        eprintln!("{err:?}");
        if let Some(path) = log_path {
            eprintln!("See {} for details", path.display());
        }
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.handle_updates(); // Handle async updates first

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                event::Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                event::Event::Paste(text) if app.mode == AppMode::Search => {
                    for c in text.chars().filter(|c| !c.is_control()) {
                        app.handle_key(event::KeyEvent::new(event::KeyCode::Char(c), event::KeyModifiers::NONE));
                    }
                }
                _ => {}
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
