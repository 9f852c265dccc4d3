//! Word cloud generation.
//!
//! Lyrics are normalized and stripped of stopwords, counted, laid out on a
//! small canvas and finally drawn at print resolution with the magma palette.
//! Generation is deterministic: the same lyrics, font and options always
//! produce the same PNG bytes.

/// Font discovery
pub mod font;
/// Word placement
pub mod layout;
/// Magma color map
pub mod palette;
/// Rasterization and encoding
pub mod render;
/// Normalization, stopwords and counting
pub mod text;

use image::Rgb;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusttype::Font;
use std::path::PathBuf;

use crate::config::Config;
use crate::constants::cloud;
use crate::error::{Error, Result};
pub use text::{collocated_frequencies, word_frequencies, WordFrequency};

/// Tunables for layout and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOptions {
    /// Layout canvas width.
    pub width: u32,
    /// Layout canvas height.
    pub height: u32,
    /// Rendered image width.
    pub output_width: u32,
    /// Rendered image height.
    pub output_height: u32,
    /// Most words placed.
    pub max_words: usize,
    /// Font size of the top word.
    pub max_font_size: u32,
    /// Smallest font size drawn.
    pub min_font_size: u32,
    /// Shrink step when a word does not fit.
    pub font_step: u32,
    /// Free pixels around each word.
    pub margin: u32,
    /// 0 sizes by rank only, 1 strictly by frequency.
    pub relative_scaling: f64,
    /// Share of words drawn horizontally.
    pub prefer_horizontal: f64,
    /// Seed for every random draw.
    pub seed: u64,
    /// Count frequent two-word phrases as one entry.
    pub collocations: bool,
    /// Likelihood score a pair must beat to become a phrase.
    pub collocation_threshold: f64,
    /// Canvas background.
    pub background: Rgb<u8>,
}

impl Default for CloudOptions {
    fn default() -> Self {
        let (inches_w, inches_h) = cloud::FIGURE_INCHES;
        Self {
            width: cloud::CANVAS_WIDTH,
            height: cloud::CANVAS_HEIGHT,
            output_width: inches_w * cloud::OUTPUT_DPI,
            output_height: inches_h * cloud::OUTPUT_DPI,
            max_words: cloud::MAX_WORDS,
            max_font_size: cloud::MAX_FONT_SIZE,
            min_font_size: cloud::MIN_FONT_SIZE,
            font_step: cloud::FONT_STEP,
            margin: cloud::MARGIN,
            relative_scaling: cloud::RELATIVE_SCALING,
            prefer_horizontal: cloud::PREFER_HORIZONTAL,
            seed: cloud::RANDOM_SEED,
            collocations: true,
            collocation_threshold: cloud::COLLOCATION_THRESHOLD,
            background: Rgb([255, 255, 255]),
        }
    }
}

/// A rendered word cloud.
#[derive(Debug, Clone)]
pub struct WordCloud {
    /// PNG-encoded image.
    pub png: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Every counted word, most frequent first.
    pub ranked: Vec<WordFrequency>,
    /// Number of words that made it onto the image.
    pub placed: usize,
}

/// Turns lyrics into word cloud images.
#[derive(Debug, Clone, Default)]
pub struct WordCloudGenerator {
    options: CloudOptions,
    font_path: Option<PathBuf>,
}

impl WordCloudGenerator {
    /// A generator with explicit options and system font discovery.
    pub const fn new(options: CloudOptions) -> Self {
        Self { options, font_path: None }
    }

    /// Default options with the font and phrase setting from `config`.
    pub fn from_config(config: &Config) -> Self {
        let options = CloudOptions { collocations: config.collocations, ..CloudOptions::default() };
        Self::new(options).with_font_path(config.font_path.clone())
    }

    /// Use a specific font file instead of searching the system.
    #[must_use]
    pub fn with_font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    /// Options in effect.
    pub const fn options(&self) -> &CloudOptions {
        &self.options
    }

    /// Ranked words (and phrases, when enabled) for `lyrics`.
    pub fn frequencies(&self, lyrics: &str) -> Vec<WordFrequency> {
        if self.options.collocations {
            collocated_frequencies(lyrics, self.options.collocation_threshold)
        } else {
            word_frequencies(lyrics)
        }
    }

    /// Generate a cloud for `lyrics`.
    ///
    /// Fails with [`Error::NothingToVisualize`] before touching fonts when no
    /// word survives filtering.
    pub fn generate(&self, lyrics: &str) -> Result<WordCloud> {
        let ranked = self.frequencies(lyrics);
        if ranked.is_empty() {
            return Err(Error::NothingToVisualize);
        }
        let font = font::load_font(self.font_path.as_deref())?;
        render_frequencies(ranked, &font, &self.options)
    }

    /// Generate a cloud with an already loaded font.
    pub fn generate_with_font(&self, lyrics: &str, font: &Font<'_>) -> Result<WordCloud> {
        let ranked = self.frequencies(lyrics);
        if ranked.is_empty() {
            return Err(Error::NothingToVisualize);
        }
        render_frequencies(ranked, font, &self.options)
    }
}

/// Lay out and draw ranked frequencies.
pub fn render_frequencies(ranked: Vec<WordFrequency>, font: &Font<'_>, options: &CloudOptions) -> Result<WordCloud> {
    if ranked.is_empty() {
        return Err(Error::NothingToVisualize);
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let layout = layout::layout(&ranked, font, options, &mut rng);
    if layout.placements.is_empty() {
        return Err(Error::render("no space to draw any word on the canvas"));
    }
    tracing::debug!("Placed {} of {} words", layout.placements.len(), ranked.len());

    let image = render::render(
        &layout,
        font,
        options.output_width,
        options.output_height,
        options.background,
    );
    let png = render::encode_png(&image)?;

    Ok(WordCloud {
        png,
        width: image.width(),
        height: image.height(),
        placed: layout.placements.len(),
        ranked,
    })
}
