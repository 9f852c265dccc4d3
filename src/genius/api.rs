use async_trait::async_trait;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::cmp::Reverse;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::Config;
use crate::constants::genius::{EXCLUDED_TERMS, MIN_TITLE_SCORE, RETRY_BACKOFF_MS};
use crate::error::{Error, Result};
use crate::genius::page::extract_lyrics_document;
use crate::genius::types::SongHit;
use crate::lyrics::LyricsProvider;

/// Titles that Genius indexes as songs but that carry no lyrics.
#[allow(clippy::expect_used)]
static RE_NON_SONG: LazyLock<Regex> = LazyLock::new(|| {
    let mut terms = vec![
        r"track\s?list".to_string(),
        r"album art(work)?".to_string(),
        r"liner notes".to_string(),
        r"booklet".to_string(),
        r"credits".to_string(),
        r"interview".to_string(),
        r"skit".to_string(),
        r"instrumental".to_string(),
        r"setlist".to_string(),
    ];
    terms.extend(EXCLUDED_TERMS.iter().map(|t| format!(r"\b{}\b", regex::escape(t))));
    Regex::new(&format!("(?i){}", terms.join("|"))).expect("valid regex: RE_NON_SONG")
});

/// Client for the Genius API
///
/// Holds the access token handed over at construction; no environment
/// lookups happen per request.
#[derive(Clone)]
pub struct GeniusClient {
    api_key: String,
    api_base: String,
    retries: u32,
    remove_section_headers: bool,
    client: Client,
}

impl GeniusClient {
    /// Create a new Genius client from config
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.genius_api_key.clone(),
            api_base: config.genius_api_base.clone(),
            retries: config.retries,
            remove_section_headers: config.remove_section_headers,
            client: Client::builder()
                .timeout(config.request_timeout)
                .user_agent(config.user_agent())
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to build HTTP client, falling back to defaults without timeout: {e}");
                    Client::new()
                }),
        }
    }

    /// Check if credentials are configured
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send a request, retrying transport failures, 429 and 5xx responses.
    ///
    /// 404 is handed back to the caller, which treats it as absence.
    async fn send_with_retry<F>(&self, what: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let err = match build().send().await {
                Ok(resp) if resp.status().is_success() || resp.status() == StatusCode::NOT_FOUND => {
                    return Ok(resp);
                }
                Ok(resp) => Error::genius_status(
                    format!("Request to {what} returned {}", resp.status()),
                    resp.status().as_u16(),
                ),
                Err(e) => Error::Network(format!("Request to {what} failed: {e}")),
            };

            if err.is_transient() && attempt < self.retries {
                attempt += 1;
                tracing::warn!("{err} (retry {attempt}/{})", self.retries);
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                continue;
            }
            return Err(err);
        }
    }

    /// Make an authenticated GET request to the API; `None` on 404
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Value>> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .send_with_retry(path, || {
                self.client
                    .get(&url)
                    .bearer_auth(&self.api_key)
                    .header("Accept", "application/json")
                    .query(query)
            })
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| Error::parse(format!("Invalid JSON from {path}: {e}"), Some(url.clone())))
    }

    /// Fetch a public song page as HTML; `None` on 404
    async fn get_page(&self, url: &str) -> Result<Option<String>> {
        let resp = self.send_with_retry(url, || self.client.get(url)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        resp.text()
            .await
            .map(Some)
            .map_err(|e| Error::Network(format!("Reading {url} failed: {e}")))
    }

    /// Search Genius for songs matching a title and artist
    pub async fn search(&self, title: &str, artist: &str) -> Result<Vec<SongHit>> {
        if !self.is_configured() {
            return Err(missing_key_error());
        }

        let term = format!("{title} {artist}");
        let Some(json) = self.get_json("/search", &[("q", term.trim())]).await? else {
            return Ok(Vec::new());
        };

        parse_search_hits(&json)
    }

    /// Download a song page and extract its lyrics document
    pub async fn fetch_song_lyrics(&self, hit: &SongHit) -> Result<Option<String>> {
        let Some(html) = self.get_page(&hit.url).await? else {
            tracing::warn!("Song page for {} is gone", hit.full_title);
            return Ok(None);
        };

        let document = extract_lyrics_document(&html, &hit.full_title, self.remove_section_headers);
        if document.is_none() {
            tracing::warn!("No lyrics containers found on {}", hit.url);
        }
        Ok(document)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    async fn search_song(&self, title: &str, artist: &str) -> Result<Option<String>> {
        if !self.is_configured() {
            return Err(missing_key_error());
        }

        let hits = self.search(title, artist).await?;
        let Some(hit) = pick_song_hit(&hits, title, artist) else {
            tracing::info!("No song hit for '{title}' by {artist} ({} results)", hits.len());
            return Ok(None);
        };

        if !hit.has_complete_lyrics() {
            tracing::info!("Skipping {}: lyrics are {:?}", hit.full_title, hit.lyrics_state);
            return Ok(None);
        }

        tracing::info!("Matched '{title}' to {} (id {})", hit.full_title, hit.id);
        self.fetch_song_lyrics(hit).await
    }
}

fn missing_key_error() -> Error {
    Error::config(
        "Genius API key not found",
        "Set GENIUS_API_KEY in the environment or the .env file",
    )
}

/// Parse song hits out of a search response
fn parse_search_hits(json: &Value) -> Result<Vec<SongHit>> {
    let hits = json["response"]["hits"]
        .as_array()
        .ok_or_else(|| Error::parse("Missing 'response.hits' array in search response", None))?;

    Ok(hits
        .iter()
        .filter(|h| h["type"].as_str() == Some("song"))
        .filter_map(|h| SongHit::from_json(&h["result"]))
        .collect())
}

/// Whether a hit title looks like an actual song rather than liner notes etc.
pub fn is_lyrics_title(title: &str) -> bool {
    !RE_NON_SONG.is_match(title)
}

/// Lowercase, drop punctuation and squeeze whitespace for title comparison.
fn clean_title(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Choose the search hit that best matches the requested song.
///
/// Non-songs and excluded variants are skipped, hits by the requested artist
/// are preferred, then an exact title match, then the best fuzzy title
/// score, then search order.
pub fn pick_song_hit<'a>(hits: &'a [SongHit], title: &str, artist: &str) -> Option<&'a SongHit> {
    let wanted = clean_title(title);
    let wanted_artist = artist.trim().to_lowercase();

    let candidates: Vec<&SongHit> = hits.iter().filter(|h| is_lyrics_title(&h.title)).collect();
    let by_artist: Vec<&SongHit> = candidates
        .iter()
        .copied()
        .filter(|h| !wanted_artist.is_empty() && h.artist.trim().to_lowercase() == wanted_artist)
        .collect();
    let pool = if by_artist.is_empty() { candidates } else { by_artist };

    if let Some(exact) = pool.iter().find(|h| clean_title(&h.title) == wanted) {
        return Some(exact);
    }

    let matcher = SkimMatcherV2::default();
    let best = pool
        .iter()
        .enumerate()
        .filter_map(|(idx, hit)| {
            let score = matcher.fuzzy_match(&clean_title(&hit.title), &wanted)?;
            (score >= MIN_TITLE_SCORE).then_some((score, Reverse(idx), *hit))
        })
        .max_by_key(|(score, idx, _)| (*score, *idx))
        .map(|(_, _, hit)| hit);

    best.or_else(|| pool.first().copied())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    fn hit(id: u64, title: &str, artist: &str) -> SongHit {
        SongHit {
            id,
            title: title.to_string(),
            full_title: format!("{title} by {artist}"),
            url: format!("https://genius.com/{id}"),
            artist: artist.to_string(),
            lyrics_state: Some("complete".to_string()),
        }
    }

    #[test]
    fn parse_search_hits_keeps_only_songs() {
        let json = json!({
            "meta": { "status": 200 },
            "response": { "hits": [
                { "type": "song", "result": {
                    "id": 1, "title": "Love Story", "url": "https://genius.com/1",
                    "primary_artist": { "name": "Taylor Swift" } } },
                { "type": "album", "result": { "id": 2, "name": "Fearless" } },
                { "type": "song", "result": { "id": 3, "title": "Broken" } }
            ] }
        });
        let hits = parse_search_hits(&json).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn parse_search_hits_requires_hits_array() {
        let err = parse_search_hits(&json!({ "response": {} })).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn non_song_titles_are_rejected() {
        assert!(!is_lyrics_title("Fearless (Tracklist)"));
        assert!(!is_lyrics_title("1989 Liner Notes"));
        assert!(!is_lyrics_title("Love Story (Remix)"));
        assert!(!is_lyrics_title("Love Story (Live)"));
        assert!(!is_lyrics_title("Red Album Artwork"));
        assert!(is_lyrics_title("Love Story"));
    }

    #[test]
    fn remix_and_live_variants_are_rejected_anywhere() {
        assert!(!is_lyrics_title("Love Story (Elvira Remix)"));
        assert!(!is_lyrics_title("Shake It Off (Live from the 1989 Tour)"));
        assert!(!is_lyrics_title("Blank Space - Remix"));
        assert!(!is_lyrics_title("Love Story [Live]"));
        assert!(!is_lyrics_title("LIVE FOREVER"));
        // Whole words only
        assert!(is_lyrics_title("Alive"));
        assert!(is_lyrics_title("Delivered"));
        assert!(is_lyrics_title("Remixed Feelings"));
    }

    #[test]
    fn exact_title_wins_over_search_order() {
        let hits = vec![
            hit(1, "Love Story (Taylor's Version)", "Taylor Swift"),
            hit(2, "Love Story", "Taylor Swift"),
        ];
        assert_eq!(pick_song_hit(&hits, "love story", "Taylor Swift").unwrap().id, 2);
    }

    #[test]
    fn requested_artist_is_preferred() {
        let hits = vec![
            hit(1, "Love Story", "Indila"),
            hit(2, "Love Story", "Taylor Swift"),
        ];
        assert_eq!(pick_song_hit(&hits, "Love Story", "taylor swift").unwrap().id, 2);
    }

    #[test]
    fn other_artists_are_used_when_requested_one_is_absent() {
        let hits = vec![hit(1, "Love Story", "Indila")];
        assert_eq!(pick_song_hit(&hits, "Love Story", "Taylor Swift").unwrap().id, 1);
    }

    #[test]
    fn fuzzy_match_beats_unrelated_first_hit() {
        let hits = vec![
            hit(1, "Shake It Off", "Taylor Swift"),
            hit(2, "All Too Well (10 Minute Version)", "Taylor Swift"),
        ];
        assert_eq!(pick_song_hit(&hits, "All Too Well", "Taylor Swift").unwrap().id, 2);
    }

    #[test]
    fn excluded_variants_never_match() {
        let hits = vec![hit(1, "Blank Space (Live)", "Taylor Swift")];
        assert!(pick_song_hit(&hits, "Blank Space", "Taylor Swift").is_none());
    }

    #[test]
    fn no_hits_means_no_match() {
        assert!(pick_song_hit(&[], "Anything", "Taylor Swift").is_none());
    }

    #[test]
    fn clean_title_ignores_case_and_punctuation() {
        assert_eq!(clean_title("  Love   Story! "), "love story");
        assert_eq!(clean_title("Mr. Perfectly Fine"), "mr perfectly fine");
    }

    #[tokio::test]
    async fn search_without_key_is_a_config_error() {
        let client = GeniusClient::new(&Config::default());
        let err = client.search("Love Story", "Taylor Swift").await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
