//! Word placement on the layout canvas.
//!
//! Words are placed largest first. Each word draws an orientation, then a
//! uniformly random free position large enough for its box; when none exists
//! the other orientation is tried once and after that the font shrinks. Free
//! positions are found with an integral image of the pixels already inked,
//! so every candidate box is checked in constant time.

use image::imageops;
use image::{GrayImage, Luma, Rgb};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use rusttype::{Font, Scale};

use super::palette::magma;
use super::text::WordFrequency;
use super::CloudOptions;

/// Direction a word is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Bottom to top, rotated a quarter turn counter-clockwise.
    Vertical,
}

impl Orientation {
    const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A word fixed on the layout canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// The word drawn.
    pub word: String,
    /// Its frequency in the lyrics.
    pub count: usize,
    /// Font size in layout pixels.
    pub font_size: u32,
    /// Drawing direction.
    pub orientation: Orientation,
    /// Left edge in layout pixels.
    pub x: u32,
    /// Top edge in layout pixels.
    pub y: u32,
    /// Fill color.
    pub color: Rgb<u8>,
}

/// Result of laying out a cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Placed words, largest first.
    pub placements: Vec<Placement>,
}

/// Summed-area table over inked canvas pixels.
pub struct OccupancyMap {
    width: u32,
    height: u32,
    /// `(height + 1) x (width + 1)` prefix sums; row 0 and column 0 are zero.
    integral: Vec<u32>,
}

impl OccupancyMap {
    /// An empty map for a canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            integral: vec![0; (width as usize + 1) * (height as usize + 1)],
        }
    }

    fn at(&self, row: u32, col: u32) -> u32 {
        self.integral[row as usize * (self.width as usize + 1) + col as usize]
    }

    /// Inked pixels inside the box whose top-left corner is `(x, y)`.
    fn inked(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        (self.at(y + h, x + w) + self.at(y, x)) - (self.at(y + h, x) + self.at(y, x + w))
    }

    fn free_in_row(&self, y: u32, w: u32, h: u32) -> usize {
        (0..=self.width - w).filter(|&x| self.inked(x, y, w, h) == 0).count()
    }

    /// Pick a uniformly random free position for a `w x h` box.
    ///
    /// Returns the top-left corner, or `None` when the box fits nowhere. The
    /// random source is consulted once, and only when a position exists.
    pub fn sample_position(&self, w: u32, h: u32, rng: &mut StdRng) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }

        let per_row: Vec<usize> = (0..=self.height - h)
            .into_par_iter()
            .map(|y| self.free_in_row(y, w, h))
            .collect();
        let total: usize = per_row.iter().sum();
        if total == 0 {
            return None;
        }

        let mut goal = rng.gen_range(0..total);
        for (y, &free) in per_row.iter().enumerate() {
            if goal >= free {
                goal -= free;
                continue;
            }
            let y = y as u32;
            return (0..=self.width - w)
                .filter(|&x| self.inked(x, y, w, h) == 0)
                .nth(goal)
                .map(|x| (x, y));
        }
        None
    }

    /// Recompute prefix sums after pixels at or below-right of `(x, y)` changed.
    pub fn update(&mut self, canvas: &GrayImage, x: u32, y: u32) {
        let stride = self.width as usize + 1;
        for row in y..self.height {
            for col in x..self.width {
                let ink = u32::from(canvas.get_pixel(col, row)[0] > 0);
                let (r, c) = (row as usize, col as usize);
                self.integral[(r + 1) * stride + c + 1] = ink + self.integral[r * stride + c + 1]
                    + self.integral[(r + 1) * stride + c]
                    - self.integral[r * stride + c];
            }
        }
    }
}

/// Pixel size of a word's ink box at `size`, or `None` if it draws nothing.
pub fn measure(font: &Font<'_>, word: &str, size: f32, orientation: Orientation) -> Option<(u32, u32)> {
    let (w, h) = text_size(Scale::uniform(size), font, word);
    if w <= 0 || h <= 0 {
        return None;
    }
    let (w, h) = (w as u32, h as u32);
    Some(match orientation {
        Orientation::Horizontal => (w, h),
        Orientation::Vertical => (h, w),
    })
}

/// Rasterize a word into a coverage mask sized to its ink box.
pub fn word_mask(font: &Font<'_>, word: &str, size: f32, orientation: Orientation) -> Option<GrayImage> {
    let (w, h) = measure(font, word, size, Orientation::Horizontal)?;
    let mut mask = GrayImage::new(w, h);
    draw_text_mut(&mut mask, Luma([255]), 0, 0, Scale::uniform(size), font, word);
    Some(match orientation {
        Orientation::Horizontal => mask,
        Orientation::Vertical => imageops::rotate270(&mask),
    })
}

/// Copy a mask's ink onto the canvas, keeping the stronger coverage.
fn stamp(canvas: &mut GrayImage, mask: &GrayImage, x: u32, y: u32) {
    for (mx, my, px) in mask.enumerate_pixels() {
        let (cx, cy) = (x + mx, y + my);
        if cx < canvas.width() && cy < canvas.height() && px[0] > 0 {
            let current = canvas.get_pixel(cx, cy)[0];
            canvas.put_pixel(cx, cy, Luma([current.max(px[0])]));
        }
    }
}

/// Lay out ranked words on the canvas.
///
/// Only the first `max_words` entries are considered. Layout stops for good
/// once a word would need a font smaller than `min_font_size` (at least 1).
pub fn layout(freqs: &[WordFrequency], font: &Font<'_>, options: &CloudOptions, rng: &mut StdRng) -> Layout {
    let (width, height) = (options.width, options.height);
    let min_font_size = options.min_font_size.max(1);
    let mut occupancy = OccupancyMap::new(width, height);
    let mut canvas = GrayImage::new(width, height);
    let mut placements = Vec::new();

    let Some(max_count) = freqs.first().map(|f| f.count as f64) else {
        return Layout { width, height, placements };
    };

    let rs = options.relative_scaling;
    let mut font_size = options.max_font_size;
    let mut last_freq = 1.0;

    for entry in freqs.iter().take(options.max_words) {
        let freq = entry.count as f64 / max_count;
        if rs > 0.0 {
            font_size = (rs.mul_add(freq / last_freq, 1.0 - rs) * f64::from(font_size)).round() as u32;
        }

        let mut orientation = if rng.gen::<f64>() < options.prefer_horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let mut tried_other = false;

        let position = loop {
            if font_size < min_font_size {
                break None;
            }
            let found = measure(font, &entry.word, font_size as f32, orientation).and_then(|(w, h)| {
                occupancy.sample_position(w + options.margin, h + options.margin, rng)
            });
            if found.is_some() {
                break found;
            }
            if !tried_other && options.prefer_horizontal < 1.0 {
                orientation = orientation.flipped();
                tried_other = true;
            } else {
                font_size = font_size.saturating_sub(options.font_step.max(1));
                orientation = Orientation::Horizontal;
            }
        };

        let Some((bx, by)) = position else {
            tracing::debug!(
                "Stopped layout at '{}' after {} words: font below minimum",
                entry.word,
                placements.len()
            );
            break;
        };

        let (x, y) = (bx + options.margin / 2, by + options.margin / 2);
        if let Some(mask) = word_mask(font, &entry.word, font_size as f32, orientation) {
            stamp(&mut canvas, &mask, x, y);
        }
        occupancy.update(&canvas, x, y);

        placements.push(Placement {
            word: entry.word.clone(),
            count: entry.count,
            font_size,
            orientation,
            x,
            y,
            color: magma(rng.gen::<f64>()),
        });
        last_freq = freq;
    }

    Layout { width, height, placements }
}
