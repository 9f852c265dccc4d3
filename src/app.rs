//! Application state and event handling.
//!
//! Lookups run on tokio tasks and report back through an `mpsc` channel that
//! the draw loop drains every frame, so the terminal never blocks on the
//! network or on rendering.

use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::cloud::WordCloud;
use crate::config::Config;
use crate::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use crate::error::{Error, Result};
use crate::export;
use crate::genius::GeniusClient;
use crate::input::{GlobalHandler, InputContext, InputHandler, InputResult, ResultsHandler, SearchHandler};
use crate::lyrics::{LyricsProvider, Lookup};
use crate::pipeline::Pipeline;

pub use crate::input::AppMode;

/// Messages from background tasks.
#[derive(Debug)]
pub enum AppUpdate {
    /// The lyrics lookup finished.
    LyricsLoaded {
        /// Title the lookup was for.
        title: String,
        /// Lookup result.
        result: Result<Lookup>,
    },
    /// The cloud for previously loaded lyrics finished rendering.
    CloudRendered {
        /// Title the cloud belongs to.
        title: String,
        /// Render result.
        result: Result<WordCloud>,
    },
}

/// What an in-flight request is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    /// Waiting for the lyrics provider.
    FetchingLyrics,
    /// Drawing the word cloud.
    RenderingCloud,
}

impl LoadingStage {
    /// Text for the loading overlay.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FetchingLyrics => "Fetching lyrics...",
            Self::RenderingCloud => "Drawing word cloud...",
        }
    }
}

/// Cloud state for the song on screen.
#[derive(Debug, Clone)]
pub enum CloudState {
    /// Still rendering.
    Pending,
    /// Rendered and ready to save.
    Ready(WordCloud),
    /// Rendering failed; the message is shown in place of the cloud.
    Failed(String),
}

/// The song currently shown in the results view.
#[derive(Debug, Clone)]
pub struct SongView {
    /// Title as entered.
    pub title: String,
    /// Lyric text.
    pub lyrics: String,
    /// Word cloud for the lyrics.
    pub cloud: CloudState,
    /// First visible lyrics line.
    pub scroll: u16,
}

impl SongView {
    fn max_scroll(&self) -> u16 {
        u16::try_from(self.lyrics.lines().count().saturating_sub(1)).unwrap_or(u16::MAX)
    }
}

/// Terminal application state.
pub struct App<P = GeniusClient> {
    /// Current mode.
    pub mode: AppMode,
    /// Title being typed.
    pub input: String,
    /// Song on screen, if any.
    pub current: Option<SongView>,
    /// In-flight request stage.
    pub loading: Option<LoadingStage>,
    /// Blocking error overlay.
    pub error_message: Option<String>,
    /// Informational overlay.
    pub status_message: Option<String>,
    /// Whether the help overlay is open.
    pub show_help: bool,
    /// Loaded configuration.
    pub config: Config,
    /// Sender handed to background tasks.
    pub async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
    pipeline: Pipeline<P>,
    should_quit: bool,
}

impl App {
    /// Load configuration and build the Genius-backed app.
    pub fn new() -> Self {
        // Load configuration (fallback to default on error)
        let config = Config::load().unwrap_or_default();
        if !config.has_genius_credentials() {
            tracing::warn!("GENIUS_API_KEY is not set; lookups will fail until it is");
        }
        let pipeline = Pipeline::from_config(&config);
        Self::with_pipeline(config, pipeline)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LyricsProvider + Clone + 'static> App<P> {
    /// Build the app around an explicit pipeline.
    pub fn with_pipeline(config: Config, pipeline: Pipeline<P>) -> Self {
        let (async_task_tx, async_task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            mode: AppMode::Search,
            input: String::new(),
            current: None,
            loading: None,
            error_message: None,
            status_message: None,
            show_help: false,
            config,
            async_task_tx,
            async_task_rx,
            pipeline,
            should_quit: false,
        }
    }

    /// Whether the main loop should exit.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether a request is in flight.
    pub const fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Artist paired with every title.
    pub fn default_artist(&self) -> &str {
        self.pipeline.default_artist()
    }

    /// Route a key press through the overlays and the mode handlers.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        // Errors block until dismissed
        if self.error_message.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_message = None;
            }
            return;
        }

        // Status messages close on any key; Esc is consumed
        if self.status_message.take().is_some() && key.code == KeyCode::Esc {
            return;
        }

        let ctx = InputContext {
            mode: self.mode,
            is_loading: self.is_loading(),
            has_result: self.current.is_some(),
            input: &self.input,
        };

        let result = match GlobalHandler.handle(key, &ctx) {
            InputResult::Ignored => match self.mode {
                AppMode::Search => SearchHandler.handle(key, &ctx),
                AppMode::Results => ResultsHandler.handle(key, &ctx),
            },
            other => other,
        };

        self.apply(result);
    }

    fn apply(&mut self, result: InputResult) {
        match result {
            InputResult::Ignored => {}
            InputResult::Quit => self.should_quit = true,
            InputResult::ShowHelp => self.show_help = true,
            InputResult::ModeChange(mode) => self.mode = mode,
            InputResult::InsertChar(c) => self.input.push(c),
            InputResult::DeleteChar => {
                self.input.pop();
            }
            InputResult::ClearInput => self.input.clear(),
            InputResult::Submit => self.submit(),
            InputResult::Scroll(delta) => self.scroll_by(delta),
            InputResult::ScrollTop => {
                if let Some(view) = &mut self.current {
                    view.scroll = 0;
                }
            }
            InputResult::SaveCloud => self.save_cloud(),
            InputResult::CopyLyrics => self.copy_lyrics(),
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        if let Some(view) = &mut self.current {
            let target = (i32::from(view.scroll) + delta).clamp(0, i32::from(view.max_scroll()));
            view.scroll = u16::try_from(target).unwrap_or(0);
        }
    }

    /// Start a lookup for the typed title.
    pub fn submit(&mut self) {
        let title = self.input.trim().to_string();
        if title.is_empty() {
            self.status_message = Some("Please enter a song title.".to_string());
            return;
        }
        if self.is_loading() {
            return;
        }

        tracing::info!("Looking up '{title}' by {}", self.default_artist());
        self.loading = Some(LoadingStage::FetchingLyrics);

        let pipeline = self.pipeline.clone();
        let tx = self.async_task_tx.clone();

        // Spawn the async task using tokio::spawn
        tokio::spawn(async move {
            let result = pipeline.fetch_lyrics(&title).await;
            let lyrics = result
                .as_ref()
                .ok()
                .and_then(Lookup::lyrics)
                .map(String::from);

            let loaded = AppUpdate::LyricsLoaded { title: title.clone(), result };
            if tx.send(loaded).await.is_err() {
                return;
            }

            if let Some(lyrics) = lyrics {
                let result = pipeline.render_cloud(lyrics).await;
                let _ = tx.send(AppUpdate::CloudRendered { title, result }).await;
            }
        });
    }

    /// Apply every pending background update.
    pub fn handle_updates(&mut self) {
        loop {
            match self.async_task_rx.try_recv() {
                Ok(update) => self.apply_update(update),
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_update(&mut self, update: AppUpdate) {
        match update {
            AppUpdate::LyricsLoaded { title, result } => match result {
                Ok(Lookup::Found(lyrics)) => {
                    tracing::info!("Loaded {} lines of lyrics for '{title}'", lyrics.lines().count());
                    self.loading = Some(LoadingStage::RenderingCloud);
                    self.current = Some(SongView {
                        title,
                        lyrics,
                        cloud: CloudState::Pending,
                        scroll: 0,
                    });
                    self.mode = AppMode::Results;
                }
                Ok(Lookup::NotFound) => {
                    tracing::info!("No lyrics found for '{title}'");
                    self.loading = None;
                    self.error_message = Some(format!(
                        "Couldn't find lyrics for '{title}'. Please check the song title and try again."
                    ));
                }
                Err(e) => {
                    tracing::warn!("Lyrics lookup for '{title}' failed: {e}");
                    self.loading = None;
                    self.error_message = Some(format!(
                        "Error fetching lyrics: {e}\nPlease check the song title and try again."
                    ));
                }
            },
            AppUpdate::CloudRendered { title, result } => {
                self.loading = None;
                let Some(view) = self.current.as_mut().filter(|v| v.title == title) else {
                    tracing::debug!("Dropping cloud for '{title}': no longer on screen");
                    return;
                };
                view.cloud = match result {
                    Ok(cloud) => {
                        tracing::info!("Rendered cloud for '{title}' with {} words", cloud.placed);
                        CloudState::Ready(cloud)
                    }
                    Err(Error::NothingToVisualize) => {
                        CloudState::Failed("No words left to draw once common words are removed.".to_string())
                    }
                    Err(e) => {
                        tracing::warn!("Rendering cloud for '{title}' failed: {e}");
                        CloudState::Failed(format!("Could not draw the word cloud: {e}"))
                    }
                };
            }
        }
    }

    /// Write the current cloud to the output directory.
    pub fn save_cloud(&mut self) {
        let Some(view) = &self.current else { return };
        let CloudState::Ready(cloud) = &view.cloud else {
            self.status_message = Some("No word cloud to save yet.".to_string());
            return;
        };

        match export::save_cloud(&self.config.output_dir, &view.title, &cloud.png) {
            Ok(path) => self.status_message = Some(format!("Saved word cloud to {}", path.display())),
            Err(e) => self.error_message = Some(format!("Failed to save word cloud: {e}")),
        }
    }

    fn copy_lyrics(&mut self) {
        let Some(view) = &self.current else { return };
        match Clipboard::new().and_then(|mut cb| cb.set_text(view.lyrics.clone())) {
            Ok(()) => self.status_message = Some("Lyrics copied to clipboard.".to_string()),
            Err(e) => self.error_message = Some(format!("Clipboard unavailable: {e}")),
        }
    }
}
