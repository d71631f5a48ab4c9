//! Perceptual per-pixel comparison of two equal-size RGBA images.
//!
//! Pixels are compared in YIQ color space after alpha-blending over white,
//! with a tolerance threshold that absorbs anti-aliasing and sub-pixel
//! rendering noise. Differing pixels are drawn pure red in the visualization
//! image; matching pixels are drawn as a faded grayscale of the first input.

use image::RgbaImage;
use thiserror::Error;

/// Color written for every differing pixel in the visualization.
const DIFF_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Maximum possible YIQ delta, between opaque black and opaque white.
const MAX_YIQ_DELTA: f32 = 35215.0;

/// Opacity applied to matching pixels in the visualization.
const BACKGROUND_ALPHA: f32 = 0.1;

#[derive(Debug, Error)]
pub enum PixelDiffError {
    #[error("image dimensions mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
}

/// Tuning knobs for the comparison.
#[derive(Debug, Clone, Copy)]
pub struct DiffOptions {
    /// Matching threshold on a 0-1 scale; deltas below it are ignored.
    pub threshold: f32,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

/// Result of comparing two equal-size images.
#[derive(Debug)]
pub struct DiffOutcome {
    /// Number of pixels whose perceptual delta exceeded the threshold.
    pub differing_pixels: u64,
    /// Same-size image with differing pixels highlighted in red.
    pub visualization: RgbaImage,
}

impl DiffOutcome {
    /// Whether the two images compared identical under the threshold.
    pub fn is_identical(&self) -> bool {
        self.differing_pixels == 0
    }
}

/// Compares `left` and `right` pixel by pixel.
///
/// The comparison is a pure function of the two buffers and the threshold:
/// no I/O, no internal state.
///
/// # Errors
///
/// Returns [`PixelDiffError::DimensionMismatch`] if the images do not share
/// identical dimensions; reconcile them first.
pub fn diff(
    left: &RgbaImage,
    right: &RgbaImage,
    options: &DiffOptions,
) -> Result<DiffOutcome, PixelDiffError> {
    if left.dimensions() != right.dimensions() {
        return Err(PixelDiffError::DimensionMismatch {
            left_width: left.width(),
            left_height: left.height(),
            right_width: right.width(),
            right_height: right.height(),
        });
    }

    let width = left.width();
    let height = left.height();
    let left_pixels = left.as_raw();
    let right_pixels = right.as_raw();
    let mut output = vec![0u8; left_pixels.len()];
    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;

    let mut differing_pixels = 0u64;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 4) as usize;
            if color_delta(left_pixels, right_pixels, idx) > max_delta {
                differing_pixels += 1;
                output[idx..idx + 4].copy_from_slice(&DIFF_COLOR);
            } else {
                draw_gray_pixel(left_pixels, idx, &mut output);
            }
        }
    }

    let visualization = RgbaImage::from_raw(width, height, output)
        .unwrap_or_else(|| RgbaImage::new(width, height));

    Ok(DiffOutcome {
        differing_pixels,
        visualization,
    })
}

/// Perceptual distance between the pixels at `idx`, in YIQ space with alpha
/// blended over a white background.
fn color_delta(left: &[u8], right: &[u8], idx: usize) -> f32 {
    if left[idx..idx + 4] == right[idx..idx + 4] {
        return 0.0;
    }

    let (r1, g1, b1, a1) = rgba_at(left, idx);
    let (r2, g2, b2, a2) = rgba_at(right, idx);

    let (r1, g1, b1) = blend_over_white(r1, g1, b1, a1);
    let (r2, g2, b2) = blend_over_white(r2, g2, b2, a2);

    let y = rgb2y(r1, g1, b1) - rgb2y(r2, g2, b2);
    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q
}

fn rgba_at(pixels: &[u8], idx: usize) -> (f32, f32, f32, f32) {
    (
        f32::from(pixels[idx]),
        f32::from(pixels[idx + 1]),
        f32::from(pixels[idx + 2]),
        f32::from(pixels[idx + 3]),
    )
}

fn blend_over_white(r: f32, g: f32, b: f32, a: f32) -> (f32, f32, f32) {
    if a < 255.0 {
        let alpha = a / 255.0;
        (blend(r, alpha), blend(g, alpha), blend(b, alpha))
    } else {
        (r, g, b)
    }
}

fn blend(channel: f32, alpha: f32) -> f32 {
    255.0 + (channel - 255.0) * alpha
}

fn rgb2y(r: f32, g: f32, b: f32) -> f32 {
    r * 0.298_895_31 + g * 0.586_622_47 + b * 0.114_482_23
}

fn rgb2i(r: f32, g: f32, b: f32) -> f32 {
    r * 0.595_977_99 - g * 0.274_176_10 - b * 0.321_801_89
}

fn rgb2q(r: f32, g: f32, b: f32) -> f32 {
    r * 0.211_470_17 - g * 0.522_617_11 + b * 0.311_146_94
}

/// Renders a matching pixel as a faded grayscale of the reference input so
/// the page remains recognizable behind the highlighted regions.
fn draw_gray_pixel(source: &[u8], idx: usize, output: &mut [u8]) {
    let (r, g, b, a) = rgba_at(source, idx);
    let gray = blend(rgb2y(r, g, b), BACKGROUND_ALPHA * a / 255.0);
    let value = gray.clamp(0.0, 255.0) as u8;
    output[idx] = value;
    output[idx + 1] = value;
    output[idx + 2] = value;
    output[idx + 3] = 255;
}
