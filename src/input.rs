//! Input handling abstractions.
//!
//! Key events are translated into [`InputResult`] actions by small
//! mode-specific handlers, so key bindings can be tested without a terminal
//! or a running app.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::constants::ui::PAGE_SCROLL;

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The input was ignored (not applicable to this handler).
    Ignored,
    /// The application should quit.
    Quit,
    /// The mode should change.
    ModeChange(AppMode),
    /// Show the help overlay.
    ShowHelp,
    /// Append a character to the title input.
    InsertChar(char),
    /// Remove the last character of the title input.
    DeleteChar,
    /// Empty the title input.
    ClearInput,
    /// Look up the entered title.
    Submit,
    /// Move the lyrics view by this many lines.
    Scroll(i32),
    /// Jump to the top of the lyrics.
    ScrollTop,
    /// Write the current cloud to the output directory.
    SaveCloud,
    /// Copy the current lyrics to the clipboard.
    CopyLyrics,
}

/// Application modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Typing a song title.
    #[default]
    Search,
    /// Reading lyrics and the cloud for the last title.
    Results,
}

/// Context passed to input handlers.
///
/// This provides handlers with the information they need to process
/// input without directly accessing the full App state.
pub struct InputContext<'a> {
    /// Current application mode.
    pub mode: AppMode,
    /// Whether a lookup or render is in flight.
    pub is_loading: bool,
    /// Whether there is a result to return to.
    pub has_result: bool,
    /// Current title input.
    pub input: &'a str,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Handler for global shortcuts (help, quit).
#[derive(Debug, Default)]
pub struct GlobalHandler;

impl InputHandler for GlobalHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputResult::Quit;
        }

        if key.code == KeyCode::F(1) {
            return InputResult::ShowHelp;
        }

        // '?' is a legal title character while typing
        if key.code == KeyCode::Char('?') && ctx.mode != AppMode::Search {
            return InputResult::ShowHelp;
        }

        InputResult::Ignored
    }

    fn name(&self) -> &'static str {
        "GlobalHandler"
    }
}

/// Handler for the title input.
#[derive(Debug, Default)]
pub struct SearchHandler;

impl InputHandler for SearchHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if !ctx.is_loading => InputResult::Submit,
            KeyCode::Backspace if !ctx.input.is_empty() => InputResult::DeleteChar,
            KeyCode::Char('u') if ctrl => InputResult::ClearInput,
            KeyCode::Char(c) if !ctrl => InputResult::InsertChar(c),
            KeyCode::Esc | KeyCode::Tab if ctx.has_result => InputResult::ModeChange(AppMode::Results),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "SearchHandler"
    }
}

/// Handler for the lyrics and cloud view.
#[derive(Debug, Default)]
pub struct ResultsHandler;

impl InputHandler for ResultsHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext<'_>) -> InputResult {
        let page = i32::from(PAGE_SCROLL);
        match key.code {
            KeyCode::Char('q') => InputResult::Quit,
            KeyCode::Char('/' | 'n') | KeyCode::Esc | KeyCode::Tab => InputResult::ModeChange(AppMode::Search),
            KeyCode::Up | KeyCode::Char('k') => InputResult::Scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => InputResult::Scroll(1),
            KeyCode::PageUp => InputResult::Scroll(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => InputResult::Scroll(page),
            KeyCode::Home | KeyCode::Char('g') => InputResult::ScrollTop,
            KeyCode::Char('s') => InputResult::SaveCloud,
            KeyCode::Char('y') => InputResult::CopyLyrics,
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "ResultsHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn make_ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn make_context(mode: AppMode) -> InputContext<'static> {
        InputContext {
            mode,
            is_loading: false,
            has_result: false,
            input: "",
        }
    }

    #[test]
    fn test_global_handler_ctrl_c_quits_everywhere() {
        let mut handler = GlobalHandler;
        for mode in [AppMode::Search, AppMode::Results] {
            assert_eq!(handler.handle(make_ctrl('c'), &make_context(mode)), InputResult::Quit);
        }
    }

    #[test]
    fn test_global_handler_f1() {
        let mut handler = GlobalHandler;
        let result = handler.handle(make_key(KeyCode::F(1)), &make_context(AppMode::Search));
        assert_eq!(result, InputResult::ShowHelp);
    }

    #[test]
    fn test_global_handler_question_mark_in_search_ignored() {
        let mut handler = GlobalHandler;
        let ctx = make_context(AppMode::Search);
        assert_eq!(handler.handle(make_key(KeyCode::Char('?')), &ctx), InputResult::Ignored);

        let ctx = make_context(AppMode::Results);
        assert_eq!(handler.handle(make_key(KeyCode::Char('?')), &ctx), InputResult::ShowHelp);
    }

    #[test]
    fn test_search_handler_typing() {
        let mut handler = SearchHandler;
        let ctx = make_context(AppMode::Search);
        let ctx = InputContext { input: "lov", ..ctx };
        assert_eq!(handler.handle(make_key(KeyCode::Char('q')), &ctx), InputResult::InsertChar('q'));
        assert_eq!(handler.handle(make_key(KeyCode::Backspace), &ctx), InputResult::DeleteChar);
        assert_eq!(handler.handle(make_ctrl('u'), &ctx), InputResult::ClearInput);
        assert_eq!(handler.handle(make_key(KeyCode::Enter), &ctx), InputResult::Submit);
    }

    #[test]
    fn test_search_handler_ignores_submit_while_loading() {
        let mut handler = SearchHandler;
        let ctx = InputContext { is_loading: true, ..make_context(AppMode::Search) };
        assert_eq!(handler.handle(make_key(KeyCode::Enter), &ctx), InputResult::Ignored);
        assert_eq!(handler.handle(make_key(KeyCode::Backspace), &ctx), InputResult::Ignored);
    }

    #[test]
    fn test_search_handler_escape_needs_result() {
        let mut handler = SearchHandler;
        let ctx = make_context(AppMode::Search);
        assert_eq!(handler.handle(make_key(KeyCode::Esc), &ctx), InputResult::Ignored);

        let ctx = InputContext { has_result: true, ..make_context(AppMode::Search) };
        assert_eq!(
            handler.handle(make_key(KeyCode::Esc), &ctx),
            InputResult::ModeChange(AppMode::Results)
        );
    }

    #[test]
    fn test_results_handler_bindings() {
        let mut handler = ResultsHandler;
        let ctx = make_context(AppMode::Results);
        assert_eq!(handler.handle(make_key(KeyCode::Char('q')), &ctx), InputResult::Quit);
        assert_eq!(handler.handle(make_key(KeyCode::Char('s')), &ctx), InputResult::SaveCloud);
        assert_eq!(handler.handle(make_key(KeyCode::Char('y')), &ctx), InputResult::CopyLyrics);
        assert_eq!(handler.handle(make_key(KeyCode::Down), &ctx), InputResult::Scroll(1));
        assert_eq!(
            handler.handle(make_key(KeyCode::PageUp), &ctx),
            InputResult::Scroll(-i32::from(PAGE_SCROLL))
        );
        assert_eq!(
            handler.handle(make_key(KeyCode::Char('/')), &ctx),
            InputResult::ModeChange(AppMode::Search)
        );
    }
}
