//! Genius data types.
//!
//! These types represent the parts of the Genius API responses we use.

use serde_json::Value;

/// A song returned by the Genius search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongHit {
    /// Genius song id
    pub id: u64,
    /// Bare song title (e.g., "Love Story")
    pub title: String,
    /// Title with artist (e.g., "Love Story by Taylor Swift")
    pub full_title: String,
    /// Public song page holding the lyrics
    pub url: String,
    /// Name of the primary artist
    pub artist: String,
    /// Transcription state reported by Genius ("complete", "unreleased", ...)
    pub lyrics_state: Option<String>,
}

impl SongHit {
    /// Build a hit from one `response.hits[].result` object.
    ///
    /// Returns `None` when a required field is missing.
    pub fn from_json(result: &Value) -> Option<Self> {
        let id = result["id"].as_u64()?;
        let title = result["title"].as_str()?.to_string();
        let url = result["url"].as_str()?.to_string();
        let artist = result["primary_artist"]["name"].as_str().unwrap_or("").to_string();
        let full_title = result["full_title"]
            .as_str()
            .map_or_else(|| format!("{title} by {artist}"), String::from);
        let lyrics_state = result["lyrics_state"].as_str().map(String::from);

        Some(Self {
            id,
            title,
            full_title,
            url,
            artist,
            lyrics_state,
        })
    }

    /// Whether Genius has a finished transcription for this song.
    ///
    /// Older payloads omit the field; those are treated as complete.
    pub fn has_complete_lyrics(&self) -> bool {
        self.lyrics_state.as_deref().map_or(true, |state| state == "complete")
    }
}
