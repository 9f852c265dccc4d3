//! `lyricloud` - song lyrics from Genius rendered as a word cloud.
//!
//! The library holds the lyrics retrieval, the word cloud generator and the
//! pipeline joining them; the `lyricloud` binary wraps them in a terminal UI
//! and `render_cloud` renders a single song from the command line.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod genius;
pub mod input;
pub mod logging;
pub mod lyrics;
pub mod pipeline;
pub mod ui;
