//! Genius API integration.
//!
//! Provides song search against the Genius REST API and lyrics extraction
//! from the public song pages it links to.

/// API client for Genius requests
pub mod api;
/// Lyrics extraction from song page markup
pub mod page;
/// Data types representing Genius resources
pub mod types;

// Re-export key components
pub use api::GeniusClient;
