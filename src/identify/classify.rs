use super::matcher::nearest;
use super::types::{BlockDescriptor, Rect};
use crate::config::ColorEntry;
use crate::error::Result;
use image::RgbImage;

/// Fraction of the band (per axis) sampled for its color.
pub const SAMPLE_RATIO: f64 = 0.2;

/// Mean RGB over `rect`, clipped to the frame. Black if nothing overlaps.
pub fn average_color(frame: &RgbImage, rect: &Rect) -> [u8; 3] {
    let x_end = rect.right().min(frame.width());
    let y_end = rect.bottom().min(frame.height());

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in rect.y..y_end {
        for x in rect.x..x_end {
            let p = frame.get_pixel(x, y);
            for (acc, &v) in sum.iter_mut().zip(p.0.iter()) {
                *acc += u64::from(v);
            }
            count += 1;
        }
    }
    if count == 0 {
        return [0, 0, 0];
    }
    sum.map(|s| ((s as f64 / count as f64).round()) as u8)
}

/// Block width in units of `unit_width`, rounded half up, at least 1.
pub fn width_units(pixel_width: u32, unit_width: u32) -> u32 {
    if unit_width == 0 {
        return 1;
    }
    ((pixel_width + unit_width / 2) / unit_width).max(1)
}

/// Describe the block occupying `band`.
pub fn classify(
    frame: &RgbImage,
    band: Rect,
    palette: &[ColorEntry],
    unit_width: u32,
) -> Result<BlockDescriptor> {
    let sample_rect = band.scaled(SAMPLE_RATIO);
    let average = average_color(frame, &sample_rect);
    let color = nearest(average, palette)?.clone();
    let width_units = width_units(band.width, unit_width);

    tracing::trace!(
        "Band at ({}, {}) {}px wide: avg #{:02X}{:02X}{:02X} -> {} x{}",
        band.x,
        band.y,
        band.width,
        average[0],
        average[1],
        average[2],
        color.name,
        width_units
    );

    Ok(BlockDescriptor {
        rect: band,
        sample_rect,
        average,
        color,
        width_units,
    })
}
