//! The magma color map.

use image::Rgb;

/// Evenly spaced magma stops, dark to light.
const MAGMA_STOPS: [[u8; 3]; 11] = [
    [0x00, 0x00, 0x04],
    [0x14, 0x0e, 0x36],
    [0x3b, 0x0f, 0x70],
    [0x64, 0x1a, 0x80],
    [0x8c, 0x29, 0x81],
    [0xb7, 0x37, 0x79],
    [0xde, 0x49, 0x68],
    [0xf7, 0x70, 0x5c],
    [0xfe, 0x9f, 0x6d],
    [0xfe, 0xcf, 0x92],
    [0xfc, 0xfd, 0xbf],
];

/// Sample magma at `t` in `[0, 1]`, interpolating linearly between stops.
///
/// Values outside the range are clamped.
pub fn magma(t: f64) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (MAGMA_STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(MAGMA_STOPS.len() - 2);
    let frac = scaled - lower as f64;

    let (a, b) = (MAGMA_STOPS[lower], MAGMA_STOPS[lower + 1]);
    let mix = |i: usize| (f64::from(b[i]) - f64::from(a[i])).mul_add(frac, f64::from(a[i])).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert_eq!(magma(0.0), Rgb([0x00, 0x00, 0x04]));
        assert_eq!(magma(1.0), Rgb([0xfc, 0xfd, 0xbf]));
        assert_eq!(magma(0.5), Rgb([0xb7, 0x37, 0x79]));
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(magma(-3.0), magma(0.0));
        assert_eq!(magma(7.5), magma(1.0));
        assert_eq!(magma(f64::NAN), magma(0.0));
    }

    #[test]
    fn midpoints_interpolate() {
        // halfway between the first two stops
        assert_eq!(magma(0.05), Rgb([0x0a, 0x07, 0x1d]));
    }

    #[test]
    fn palette_brightens_overall() {
        let luma = |c: Rgb<u8>| u32::from(c[0]) + u32::from(c[1]) + u32::from(c[2]);
        assert!(luma(magma(0.0)) < luma(magma(0.5)));
        assert!(luma(magma(0.5)) < luma(magma(1.0)));
    }
}
