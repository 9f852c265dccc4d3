//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Genius API error with status context
    #[error("Genius API error: {message}")]
    Genius {
        /// Human-readable error description.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Provider response parsing error
    #[error("Parse error for {url:?}: {message}")]
    Parse {
        /// URL of the response that failed to parse, if known.
        url: Option<String>,
        /// Description of the parse failure.
        message: String,
    },

    /// Caller supplied an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The lyrics contained no words left after stopword filtering
    #[error("Nothing to visualize: no words remain after filtering")]
    NothingToVisualize,

    /// Font loading, layout or PNG encoding failure
    #[error("Render error: {0}")]
    Render(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a Genius error with HTTP status
    pub fn genius_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            401 => Some("Check the GENIUS_API_KEY environment variable"),
            403 => Some("Your Genius token may lack required permissions"),
            404 => Some("The requested resource was not found"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Genius server error - try again later"),
            _ => None,
        };
        Self::Genius {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with URL context
    pub fn parse(message: impl Into<String>, url: impl Into<Option<String>>) -> Self {
        Self::Parse { url: url.into(), message: message.into() }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Genius { status: Some(status), .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
