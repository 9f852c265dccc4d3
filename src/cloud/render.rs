//! Final rasterization and PNG encoding.

use image::codecs::png::PngEncoder;
use image::{ColorType, GrayImage, ImageEncoder, Rgb, RgbImage};
use rusttype::Font;

use super::layout::{word_mask, Layout};
use crate::error::Result;

/// Draw a finished layout at the output resolution.
///
/// Each word is rasterized again at the scaled font size rather than
/// upsampling the layout canvas, so edges stay sharp.
pub fn render(layout: &Layout, font: &Font<'_>, out_width: u32, out_height: u32, background: Rgb<u8>) -> RgbImage {
    let scale_x = f64::from(out_width) / f64::from(layout.width.max(1));
    let scale_y = f64::from(out_height) / f64::from(layout.height.max(1));
    let scale = scale_x.min(scale_y);

    let mut image = RgbImage::from_pixel(out_width, out_height, background);
    for placement in &layout.placements {
        let size = (f64::from(placement.font_size) * scale) as f32;
        let Some(mask) = word_mask(font, &placement.word, size, placement.orientation) else {
            continue;
        };
        let x = (f64::from(placement.x) * scale_x).round() as u32;
        let y = (f64::from(placement.y) * scale_y).round() as u32;
        blend(&mut image, &mask, x, y, placement.color);
    }
    image
}

/// Composite `color` through a coverage mask.
fn blend(image: &mut RgbImage, mask: &GrayImage, x: u32, y: u32, color: Rgb<u8>) {
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let alpha = u32::from(coverage[0]);
        let (ix, iy) = (x + mx, y + my);
        if alpha == 0 || ix >= image.width() || iy >= image.height() {
            continue;
        }
        let dst = image.get_pixel_mut(ix, iy);
        for channel in 0..3 {
            let under = u32::from(dst[channel]);
            let over = u32::from(color[channel]);
            dst[channel] = ((under * (255 - alpha) + over * alpha + 127) / 255) as u8;
        }
    }
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use image::Luma;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn full_coverage_replaces_background() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let mask = GrayImage::from_pixel(2, 2, Luma([255]));
        blend(&mut image, &mask, 1, 1, Rgb([10, 20, 30]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([10, 20, 30]));
        assert_eq!(*image.get_pixel(2, 2), Rgb([10, 20, 30]));
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(3, 3), Rgb([255, 255, 255]));
    }

    #[test]
    fn partial_coverage_mixes_and_edges_clip() {
        let mut image = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let mask = GrayImage::from_pixel(3, 3, Luma([128]));
        blend(&mut image, &mask, 1, 1, Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([127, 127, 127]));
        assert_eq!(*image.get_pixel(0, 1), Rgb([255, 255, 255]));
    }

    #[test]
    fn empty_layout_renders_background() {
        let layout = Layout { width: 8, height: 4, placements: Vec::new() };
        // Any parsed font works; nothing is drawn.
        let Ok(font) = crate::cloud::font::load_font(None) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let image = render(&layout, &font, 16, 8, Rgb([255, 255, 255]));
        assert_eq!(image.dimensions(), (16, 8));
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn encodes_png() {
        let image = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let bytes = encode_png(&image).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }
}
