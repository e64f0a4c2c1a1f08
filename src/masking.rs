//! Per-pixel color matching and transparency compositing.
//!
//! A pixel matches a rule when every RGB channel lies within the rule's
//! effective tolerance of the target color. The per-rule matches union into
//! a binary mask, and masked pixels are rewritten as fully transparent black.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::rules::{ColorRule, ColorRuleSet};

/// Full-scale mask value marking a matched pixel.
const MASK_SET: u8 = 255;

/// Bytes per pixel in the normalized RGBA layout.
const RGBA_CHANNELS: usize = 4;

/// Normalize a decoded image to 8-bit RGBA.
///
/// Grayscale broadcasts to RGB before an opaque alpha channel is appended;
/// RGB gains an opaque alpha channel; RGBA passes through unchanged.
///
/// # Errors
///
/// Returns [`Error::UnsupportedLayout`] for any other decoded layout,
/// naming the layout that was rejected.
pub fn normalize(image: DynamicImage) -> Result<RgbaImage> {
    match image {
        DynamicImage::ImageLuma8(gray) => {
            let mut rgba = RgbaImage::new(gray.width(), gray.height());
            for (out, px) in rgba.pixels_mut().zip(gray.pixels()) {
                let v = px[0];
                *out = Rgba([v, v, v, u8::MAX]);
            }
            Ok(rgba)
        }
        DynamicImage::ImageRgb8(rgb) => {
            let mut rgba = RgbaImage::new(rgb.width(), rgb.height());
            for (out, px) in rgba.pixels_mut().zip(rgb.pixels()) {
                *out = Rgba([px[0], px[1], px[2], u8::MAX]);
            }
            Ok(rgba)
        }
        DynamicImage::ImageRgba8(rgba) => Ok(rgba),
        other => Err(Error::UnsupportedLayout {
            layout: format!("{:?}", other.color()),
        }),
    }
}

/// Whether a single RGBA pixel (as raw bytes) matches a rule on all three
/// color channels. Alpha never participates in matching.
fn pixel_matches(px: &[u8], rule: &ColorRule) -> bool {
    let tol = rule.effective_tolerance();
    u32::from(px[0].abs_diff(rule.rgb[0])) <= tol
        && u32::from(px[1].abs_diff(rule.rgb[1])) <= tol
        && u32::from(px[2].abs_diff(rule.rgb[2])) <= tol
}

/// Evaluate every rule against one row of pixels, OR-ing matches into the
/// mask row.
fn mask_row(src_row: &[u8], mask_row: &mut [u8], rules: &[ColorRule]) {
    for (px, out) in src_row.chunks_exact(RGBA_CHANNELS).zip(mask_row.iter_mut()) {
        if rules.iter().any(|rule| pixel_matches(px, rule)) {
            *out = MASK_SET;
        }
    }
}

/// Compute the binary match mask for an image against a rule set.
///
/// The mask has the image's dimensions; a pixel is full-scale when at least
/// one rule matches it, 0 otherwise. The union across rules is commutative,
/// so rule order never affects the result. Rows are evaluated in parallel
/// when the `cli` feature is enabled (via rayon); the serial fallback is
/// bit-identical.
#[must_use]
pub fn compute_mask(image: &RgbaImage, rules: &ColorRuleSet) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut mask = GrayImage::new(width, height);
    if rules.is_empty() || width == 0 || height == 0 {
        return mask;
    }

    #[allow(clippy::cast_possible_truncation)]
    let row_px = width as usize;
    let src = image.as_raw();
    let mask_buf: &mut [u8] = &mut mask;

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        mask_buf
            .par_chunks_mut(row_px)
            .zip(src.par_chunks(row_px * RGBA_CHANNELS))
            .for_each(|(mask_row_buf, src_row)| {
                mask_row(src_row, mask_row_buf, rules.as_slice());
            });
    }

    #[cfg(not(feature = "cli"))]
    {
        for (mask_row_buf, src_row) in mask_buf
            .chunks_mut(row_px)
            .zip(src.chunks(row_px * RGBA_CHANNELS))
        {
            mask_row(src_row, mask_row_buf, rules.as_slice());
        }
    }

    mask
}

/// Composite a mask onto an image: masked pixels become fully transparent
/// black, all four channels zeroed. Unmasked pixels stay byte-identical to
/// the source, original alpha included.
#[must_use]
pub fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    debug_assert_eq!(image.dimensions(), mask.dimensions());
    let mut out = image.clone();
    for (px, m) in out.pixels_mut().zip(mask.pixels()) {
        if m[0] != 0 {
            *px = Rgba([0, 0, 0, 0]);
        }
    }
    out
}

/// Mask an image against a rule set.
///
/// With an empty rule set the result is a plain copy of the input and no
/// mask is built. The result is a pure function of the two arguments:
/// identical inputs always produce a byte-identical image.
#[must_use]
pub fn mask_image(image: &RgbaImage, rules: &ColorRuleSet) -> RgbaImage {
    if rules.is_empty() {
        return image.clone();
    }
    let mask = compute_mask(image, rules);
    apply_mask(image, &mask)
}
