//! Padding of two captures to a shared canvas size.
//!
//! Real pages frequently render at different heights (and occasionally
//! widths), so the two screenshots of a pair cannot be compared directly.
//! Reconciliation pads both images to `(max(w1,w2), max(h1,h2))` without
//! scaling or cropping: each original is copied to the top-left origin of a
//! zero-filled canvas, so the overlapping region stays pixel-exact and the
//! non-overlapping region compares against transparent black.

use image::{RgbaImage, imageops};

/// Pads `a` and `b` to their common maximum dimensions.
///
/// The returned images always share identical dimensions and are suitable
/// for [`crate::diff`].
pub fn reconcile(a: &RgbaImage, b: &RgbaImage) -> (RgbaImage, RgbaImage) {
    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    (pad_to(a, width, height), pad_to(b, width, height))
}

/// Copies `source` into the top-left corner of a transparent `width`x`height`
/// canvas. Returns a plain copy when the source already has the target size.
fn pad_to(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, source, 0, 0);
    canvas
}
