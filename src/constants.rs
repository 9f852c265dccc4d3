//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Genius provider constants.
pub mod genius {
    /// Default base URL of the Genius REST API.
    pub const API_BASE: &str = "https://api.genius.com";

    /// Default per-request timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 10;

    /// Default number of retries after the first attempt.
    pub const RETRIES: u32 = 2;

    /// Pause between retry attempts in milliseconds.
    pub const RETRY_BACKOFF_MS: u64 = 250;

    /// Words that mark a search hit as a variant we never want.
    ///
    /// Matched as whole words anywhere in the title, ignoring case.
    pub const EXCLUDED_TERMS: &[&str] = &["remix", "live"];

    /// Minimum fuzzy score for a title to count as a close match.
    pub const MIN_TITLE_SCORE: i64 = 40;
}

/// Word cloud layout and rendering constants.
pub mod cloud {
    /// Layout canvas width in pixels.
    pub const CANVAS_WIDTH: u32 = 800;

    /// Layout canvas height in pixels.
    pub const CANVAS_HEIGHT: u32 = 400;

    /// Most words placed in one cloud.
    pub const MAX_WORDS: usize = 100;

    /// Font size of the most frequent word.
    pub const MAX_FONT_SIZE: u32 = 100;

    /// Words that would shrink below this size are not placed.
    pub const MIN_FONT_SIZE: u32 = 4;

    /// Font size decrement when a word does not fit.
    pub const FONT_STEP: u32 = 1;

    /// Free pixels kept around each word.
    pub const MARGIN: u32 = 2;

    /// Weight of relative frequency versus rank when sizing words.
    pub const RELATIVE_SCALING: f64 = 0.5;

    /// Probability that a word is laid out horizontally.
    pub const PREFER_HORIZONTAL: f64 = 0.9;

    /// Likelihood score above which a word pair is counted as a phrase.
    pub const COLLOCATION_THRESHOLD: f64 = 30.0;

    /// Seed for orientation, placement and color draws.
    pub const RANDOM_SEED: u64 = 42;

    /// Output resolution in dots per inch.
    pub const OUTPUT_DPI: u32 = 300;

    /// Output figure size in inches (width, height).
    pub const FIGURE_INCHES: (u32, u32) = (10, 5);

    /// Suffix appended to downloaded cloud file names.
    pub const DOWNLOAD_SUFFIX: &str = "_wordcloud.png";
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 16;
}

/// UI layout constants.
pub mod ui {
    /// Width percentage of the lyrics pane in the results view.
    pub const LYRICS_PANE_PERCENT: u16 = 60;

    /// Number of ranked words listed beside the lyrics.
    pub const TOP_WORDS_SHOWN: usize = 25;

    /// Lines scrolled by PgUp/PgDn.
    pub const PAGE_SCROLL: u16 = 10;
}
