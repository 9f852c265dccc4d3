//! Title in, lyrics and word cloud out.
//!
//! Ties the lyrics fetcher to the cloud generator. Rendering is CPU bound and
//! runs on the blocking pool so the UI loop keeps ticking.

use crate::cloud::{WordCloud, WordCloudGenerator};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::genius::GeniusClient;
use crate::lyrics::{LyricsFetcher, LyricsProvider, Lookup};

/// Lyrics and the cloud drawn from them.
#[derive(Debug, Clone)]
pub struct Visualization {
    /// Title as entered.
    pub title: String,
    /// Lyric text with the header removed.
    pub lyrics: String,
    /// Rendered cloud.
    pub cloud: WordCloud,
}

/// Result of a full visualization request.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Lyrics were found and drawn.
    Rendered(Visualization),
    /// No lyrics exist for the title.
    NotFound,
}

/// Fetch-then-render workflow.
#[derive(Debug, Clone)]
pub struct Pipeline<P> {
    fetcher: LyricsFetcher<P>,
    generator: WordCloudGenerator,
}

impl Pipeline<GeniusClient> {
    /// Production pipeline backed by Genius.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            LyricsFetcher::new(GeniusClient::new(config), config.default_artist.clone()),
            WordCloudGenerator::from_config(config),
        )
    }
}

impl<P: LyricsProvider + Clone + 'static> Pipeline<P> {
    /// Combine a fetcher and a generator.
    pub const fn new(fetcher: LyricsFetcher<P>, generator: WordCloudGenerator) -> Self {
        Self { fetcher, generator }
    }

    /// Artist every title is searched with.
    pub fn default_artist(&self) -> &str {
        self.fetcher.default_artist()
    }

    /// Fetch the lyrics for `title`.
    pub async fn fetch_lyrics(&self, title: &str) -> Result<Lookup> {
        self.fetcher.fetch(title).await
    }

    /// Render a cloud off the async executor.
    pub async fn render_cloud(&self, lyrics: String) -> Result<WordCloud> {
        let generator = self.generator.clone();
        tokio::task::spawn_blocking(move || generator.generate(&lyrics))
            .await
            .map_err(|e| Error::Msg(format!("Render task failed: {e}")))?
    }

    /// Fetch the lyrics for `title` and draw them.
    pub async fn visualize(&self, title: &str) -> Result<Outcome> {
        let lyrics = match self.fetch_lyrics(title).await? {
            Lookup::Found(lyrics) => lyrics,
            Lookup::NotFound => return Ok(Outcome::NotFound),
        };
        let cloud = self.render_cloud(lyrics.clone()).await?;
        Ok(Outcome::Rendered(Visualization {
            title: title.trim().to_string(),
            lyrics,
            cloud,
        }))
    }
}
