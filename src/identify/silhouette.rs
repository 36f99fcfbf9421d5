//! Block-stack silhouette from a color frame.
//!
//! The frame is reduced to a single channel mixing HSL lightness and
//! saturation, binarized, and the largest outer region (holes filled) that
//! does not swallow almost the whole frame is kept.

use super::types::Silhouette;
use image::{GrayImage, Luma, RgbImage};
use imageproc::region_labelling::{connected_components, Connectivity};
use palette::{FromColor, Hsl, Srgb};
use std::collections::HashSet;

/// Weight of lightness in the blended channel; saturation gets the rest.
const LIGHTNESS_WEIGHT: f32 = 0.5;

/// Regions covering more than this fraction of the frame are treated as
/// lighting artifacts, not as the stack.
const MAX_AREA_FRACTION: f64 = 0.9;

/// Per-pixel `0.5 * lightness + 0.5 * saturation`, both on a 0-255 scale.
pub fn blended_channel(frame: &RgbImage) -> GrayImage {
    let _span = tracing::debug_span!("blend").entered();

    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        let hsl: Hsl = Hsl::from_color(Srgb::new(p[0], p[1], p[2]).into_format::<f32>());
        let l = (hsl.lightness * 255.0).round();
        let s = (hsl.saturation * 255.0).round();
        let mixed = LIGHTNESS_WEIGHT * l + (1.0 - LIGHTNESS_WEIGHT) * s;
        Luma([mixed.round().clamp(0.0, 255.0) as u8])
    })
}

/// Foreground (255) where `channel >= threshold`, background (0) elsewhere.
pub fn binarize(channel: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(channel.width(), channel.height(), |x, y| {
        if channel.get_pixel(x, y)[0] >= threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Foreground plus every background pocket not reachable from the frame border.
fn fill_holes(binary: &GrayImage) -> GrayImage {
    let (width, height) = binary.dimensions();
    let inverted = GrayImage::from_fn(width, height, |x, y| Luma([255 - binary.get_pixel(x, y)[0]]));
    let background = connected_components(&inverted, Connectivity::Four, Luma([0u8]));

    let mut outside = HashSet::new();
    let mut mark = |x: u32, y: u32| {
        let label = background.get_pixel(x, y)[0];
        if label != 0 {
            outside.insert(label);
        }
    };
    for x in 0..width {
        mark(x, 0);
        mark(x, height - 1);
    }
    for y in 0..height {
        mark(0, y);
        mark(width - 1, y);
    }

    GrayImage::from_fn(width, height, |x, y| {
        let label = background.get_pixel(x, y)[0];
        if label == 0 || !outside.contains(&label) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Largest filled outer region of a binary mask, skipping regions whose area
/// exceeds 90% of the frame.
pub fn largest_region(binary: &GrayImage) -> Option<Silhouette> {
    let (width, height) = binary.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let filled = fill_holes(binary);
    let labels = connected_components(&filled, Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<u64> = Vec::new();
    for label in labels.pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        if areas.len() <= label {
            areas.resize(label + 1, 0);
        }
        areas[label] += 1;
    }

    let limit = f64::from(width) * f64::from(height) * MAX_AREA_FRACTION;
    let mut best: Option<(u32, u64)> = None;
    for (label, &area) in areas.iter().enumerate().skip(1) {
        if area == 0 || area as f64 >= limit {
            continue;
        }
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((label as u32, area));
        }
    }

    let (label, area) = best?;
    tracing::debug!(
        "Selected region {} of {} with area {} ({:.1}% of frame)",
        label,
        areas.len().saturating_sub(1),
        area,
        100.0 * area as f64 / (f64::from(width) * f64::from(height))
    );

    let mask = GrayImage::from_fn(width, height, |x, y| {
        if labels.get_pixel(x, y)[0] == label {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    Some(Silhouette { mask, area })
}

/// Silhouette of the block stack, or `None` when nothing qualifies.
pub fn extract_silhouette(frame: &RgbImage, bin_threshold: u8) -> Option<Silhouette> {
    let _span = tracing::debug_span!("silhouette").entered();

    let blended = blended_channel(frame);
    let binary = binarize(&blended, bin_threshold);
    largest_region(&binary)
}
