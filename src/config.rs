//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.
//! Values are read once at startup and handed to the components that need
//! them; nothing reads the environment at request time.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::genius;
use crate::error::Result;

/// Artist used when the user only supplies a song title.
pub const DEFAULT_ARTIST: &str = "Taylor Swift";

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Genius API access token
    pub genius_api_key: String,
    /// Base URL of the Genius API (overridable for testing)
    pub genius_api_base: String,
    /// Per-request timeout for provider calls
    pub request_timeout: Duration,
    /// Retries after the first attempt for transient provider failures
    pub retries: u32,
    /// Artist paired with every title search
    pub default_artist: String,
    /// Strip `[Verse 1]` style markers from fetched lyrics
    pub remove_section_headers: bool,
    /// Directory where downloaded word clouds are written
    pub output_dir: PathBuf,
    /// Explicit font file for the word cloud, overriding system discovery
    pub font_path: Option<PathBuf>,
    /// Count frequent two-word phrases as one cloud entry
    pub collocations: bool,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// `User-Agent` sent with every Genius request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.app_name, self.app_version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            genius_api_key: String::new(),
            genius_api_base: genius::API_BASE.to_string(),
            request_timeout: Duration::from_secs(genius::TIMEOUT_SECS),
            retries: genius::RETRIES,
            default_artist: DEFAULT_ARTIST.to_string(),
            remove_section_headers: true,
            output_dir: default_output_dir(),
            font_path: None,
            collocations: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup("GENIUS_API_KEY") {
            config.genius_api_key = key.trim().to_string();
        }

        if let Some(base) = lookup("GENIUS_API_BASE").filter(|b| !b.trim().is_empty()) {
            config.genius_api_base = base.trim().trim_end_matches('/').to_string();
        }

        if let Some(secs) = lookup("GENIUS_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(retries) = lookup("GENIUS_RETRIES").and_then(|s| s.parse::<u32>().ok()) {
            config.retries = retries;
        }

        if let Some(artist) = lookup("DEFAULT_ARTIST") {
            config.default_artist = artist.trim().to_string();
        }

        if let Some(flag) = lookup("REMOVE_SECTION_HEADERS") {
            config.remove_section_headers = !is_off(&flag);
        }

        if let Some(flag) = lookup("CLOUD_COLLOCATIONS") {
            config.collocations = !is_off(&flag);
        }

        // Output dir: env var override (with ~ expansion), or downloads folder
        if let Some(dir) = lookup("OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            config.output_dir = PathBuf::from(shellexpand::tilde(dir.trim()).to_string());
        }

        config.font_path = lookup("CLOUD_FONT_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p.trim()).to_string()));

        config
    }

    /// Check if the Genius credential is configured
    pub fn has_genius_credentials(&self) -> bool {
        !self.genius_api_key.is_empty()
    }
}

fn is_off(flag: &str) -> bool {
    matches!(flag.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}

/// Downloads folder when the platform has one, else the working directory.
fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert!(!config.has_genius_credentials());
        assert_eq!(config.default_artist, DEFAULT_ARTIST);
        assert_eq!(config.genius_api_base, "https://api.genius.com");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.retries, 2);
        assert!(config.remove_section_headers);
        assert!(config.font_path.is_none());
        assert!(config.collocations);
        assert_eq!(config.app_name(), "lyricloud");
        assert_eq!(config.app_version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(config.user_agent(), format!("lyricloud/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn reads_credentials_and_overrides() {
        let config = config_from(&[
            ("GENIUS_API_KEY", "  secret-token \n"),
            ("GENIUS_API_BASE", "http://127.0.0.1:8080/"),
            ("GENIUS_TIMEOUT_SECS", "3"),
            ("GENIUS_RETRIES", "0"),
            ("DEFAULT_ARTIST", "Phoebe Bridgers"),
            ("REMOVE_SECTION_HEADERS", "false"),
            ("OUTPUT_DIR", "/tmp/clouds"),
            ("CLOUD_FONT_PATH", "/fonts/Sans.ttf"),
            ("CLOUD_COLLOCATIONS", "Off"),
        ]);
        assert!(config.has_genius_credentials());
        assert_eq!(config.genius_api_key, "secret-token");
        assert_eq!(config.genius_api_base, "http://127.0.0.1:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.retries, 0);
        assert_eq!(config.default_artist, "Phoebe Bridgers");
        assert!(!config.remove_section_headers);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/clouds"));
        assert_eq!(config.font_path, Some(PathBuf::from("/fonts/Sans.ttf")));
        assert!(!config.collocations);
    }

    #[test]
    fn unparseable_numbers_keep_defaults() {
        let config = config_from(&[("GENIUS_TIMEOUT_SECS", "soon"), ("GENIUS_RETRIES", "-1")]);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        let config = config_from(&[("GENIUS_API_KEY", "   ")]);
        assert!(!config.has_genius_credentials());
    }
}
