//! Lyrics retrieval.
//!
//! Looks a song up through a [`LyricsProvider`] and strips the header the
//! provider puts in front of the lyric text.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// A source of raw lyrics documents.
///
/// `GeniusClient` is the production implementation; tests plug in canned
/// providers.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Search for a song and return its raw lyrics document.
    ///
    /// `Ok(None)` means the provider had no match. Errors are reserved for
    /// configuration problems and transport/provider failures.
    async fn search_song(&self, title: &str, artist: &str) -> Result<Option<String>>;
}

/// Result of a lyrics lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Lyric text with the provider header removed.
    Found(String),
    /// The provider had no lyrics for this title.
    NotFound,
}

impl Lookup {
    /// The lyrics, if any were found.
    pub fn lyrics(&self) -> Option<&str> {
        match self {
            Self::Found(lyrics) => Some(lyrics),
            Self::NotFound => None,
        }
    }
}

/// Drop everything up to and including the first blank line.
///
/// Providers prepend title and contributor lines separated from the lyrics
/// by an empty line. Text without a blank line is returned whole. The result
/// is trimmed either way.
pub fn strip_header(document: &str) -> String {
    let normalized = document.replace("\r\n", "\n");
    normalized
        .split_once("\n\n")
        .map_or(normalized.as_str(), |(_, body)| body)
        .trim()
        .to_string()
}

/// Fetches lyrics for titles by a fixed default artist.
#[derive(Debug, Clone)]
pub struct LyricsFetcher<P> {
    provider: P,
    default_artist: String,
}

impl<P: LyricsProvider> LyricsFetcher<P> {
    /// Create a fetcher that pairs every title with `default_artist`.
    pub fn new(provider: P, default_artist: impl Into<String>) -> Self {
        Self {
            provider,
            default_artist: default_artist.into(),
        }
    }

    /// Artist paired with every lookup.
    pub fn default_artist(&self) -> &str {
        &self.default_artist
    }

    /// Look up the lyrics for `title`.
    ///
    /// A blank title is rejected before the provider is consulted.
    pub async fn fetch(&self, title: &str) -> Result<Lookup> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("song title must not be empty".to_string()));
        }

        let Some(document) = self.provider.search_song(title, &self.default_artist).await? else {
            return Ok(Lookup::NotFound);
        };

        let lyrics = strip_header(&document);
        if lyrics.is_empty() {
            tracing::info!("Provider returned an empty lyrics body for '{title}'");
            return Ok(Lookup::NotFound);
        }

        Ok(Lookup::Found(lyrics))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider returning a fixed response and counting calls.
    struct CannedProvider {
        response: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl CannedProvider {
        fn new(response: Option<&str>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                response: response.map(String::from),
                calls: Arc::clone(&calls),
            };
            (provider, calls)
        }
    }

    #[async_trait]
    impl LyricsProvider for CannedProvider {
        async fn search_song(&self, _title: &str, _artist: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Provider that always fails like an unreachable server.
    struct FailingProvider;

    #[async_trait]
    impl LyricsProvider for FailingProvider {
        async fn search_song(&self, _title: &str, _artist: &str) -> Result<Option<String>> {
            Err(Error::Network("connection refused".to_string()))
        }
    }

    #[test]
    fn strip_header_keeps_text_after_first_blank_line() {
        let doc = "148 Contributors Love Story Lyrics\n\nWe were both young\n\nRomeo, take me";
        assert_eq!(strip_header(doc), "We were both young\n\nRomeo, take me");
    }

    #[test]
    fn strip_header_without_separator_returns_trimmed_text() {
        assert_eq!(strip_header("  just one stanza\nof lyrics \n"), "just one stanza\nof lyrics");
    }

    #[test]
    fn strip_header_handles_windows_line_endings() {
        assert_eq!(strip_header("Header\r\n\r\nBody line\r\n"), "Body line");
    }

    #[tokio::test]
    async fn fetch_returns_body_of_mocked_document() {
        let (provider, calls) = CannedProvider::new(Some("Love Story Lyrics\n\nWe were both young"));
        let fetcher = LyricsFetcher::new(provider, "Taylor Swift");

        let lookup = fetcher.fetch("Love Story").await.unwrap();
        assert_eq!(lookup, Lookup::Found("We were both young".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_match_is_absence_not_error() {
        let (provider, _) = CannedProvider::new(None);
        let fetcher = LyricsFetcher::new(provider, "Taylor Swift");

        let lookup = fetcher.fetch("Not A Real Song").await.unwrap();
        assert_eq!(lookup, Lookup::NotFound);
        assert!(lookup.lyrics().is_none());
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let fetcher = LyricsFetcher::new(FailingProvider, "Taylor Swift");
        let err = fetcher.fetch("Love Story").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn blank_title_never_reaches_provider() {
        let (provider, calls) = CannedProvider::new(Some("x\n\ny"));
        let fetcher = LyricsFetcher::new(provider, "Taylor Swift");

        let err = fetcher.fetch("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn header_only_document_is_absence() {
        let (provider, _) = CannedProvider::new(Some("Love Story Lyrics\n\n   "));
        let fetcher = LyricsFetcher::new(provider, "Taylor Swift");
        assert_eq!(fetcher.fetch("Love Story").await.unwrap(), Lookup::NotFound);
    }
}
