//! Partition of a silhouette mask into one horizontal band per block.

use super::types::{Rect, MIN_BAND_PIXELS};
use crate::config::Tuning;
use image::GrayImage;
use ndarray::{s, Array2, ArrayView1, Axis};

/// Rows spanned by solid block bodies, studs trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalExtent {
    pub top: usize,
    pub bottom: usize,
}

impl VerticalExtent {
    /// Number of whole blocks in the extent, rounded half up.
    pub fn block_count(&self, block_height: usize) -> usize {
        if block_height == 0 {
            return 0;
        }
        (self.bottom - self.top + block_height / 2) / block_height
    }

    /// Anchor row of band `index` out of `count`, interpolated between top and bottom.
    pub fn anchor(&self, index: usize, count: usize) -> usize {
        (self.top * (count - index) + self.bottom * index) / count
    }
}

/// Mask as a row-major `f64` matrix, shape `(height, width)`.
fn density(mask: &GrayImage) -> Array2<f64> {
    let (width, height) = mask.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        f64::from(mask.get_pixel(col as u32, row as u32)[0])
    })
}

/// Index of the first profile value at or above `threshold`.
pub fn first_crossing(profile: ArrayView1<'_, f64>, threshold: u8) -> Option<usize> {
    let threshold = f64::from(threshold);
    profile.iter().position(|&v| v >= threshold)
}

/// Index of the last profile value at or above `threshold`.
pub fn last_crossing(profile: ArrayView1<'_, f64>, threshold: u8) -> Option<usize> {
    let threshold = f64::from(threshold);
    profile.iter().rposition(|&v| v >= threshold)
}

/// Scans the row-mean profile inward from both ends until it reaches
/// `stud_threshold`. `None` if no row qualifies or the scans cross.
pub fn vertical_extent(mask: &GrayImage, stud_threshold: u8) -> Option<VerticalExtent> {
    let rows = density(mask).mean_axis(Axis(1))?;
    extent_from_rows(rows.view(), stud_threshold)
}

fn extent_from_rows(rows: ArrayView1<'_, f64>, stud_threshold: u8) -> Option<VerticalExtent> {
    let top = first_crossing(rows, stud_threshold)?;
    let bottom = last_crossing(rows, stud_threshold)?;
    if bottom <= top {
        tracing::debug!("Degenerate vertical extent: top={} bottom={}", top, bottom);
        return None;
    }
    Some(VerticalExtent { top, bottom })
}

/// Band rectangles, in order from the top of the frame down.
///
/// Bands too close to the bottom edge to hold a full block, and bands whose
/// left/right scan does not resolve, are dropped.
pub fn segment_bands(mask: &GrayImage, tuning: &Tuning) -> Vec<Rect> {
    let _span = tracing::debug_span!("bands").entered();

    let block_height = tuning.nominal_block_height() as usize;
    let height = mask.height() as usize;
    if block_height == 0 || height == 0 || mask.width() == 0 {
        return Vec::new();
    }

    let density = density(mask);
    let Some(rows) = density.mean_axis(Axis(1)) else {
        return Vec::new();
    };
    let Some(extent) = extent_from_rows(rows.view(), tuning.stud_threshold) else {
        return Vec::new();
    };

    let count = extent.block_count(block_height);
    tracing::debug!(
        "Stack spans rows {}..={} -> {} block(s) of {}px",
        extent.top,
        extent.bottom,
        count,
        block_height
    );

    let mut bands = Vec::with_capacity(count);
    for i in 0..count {
        let y = extent.anchor(i, count);
        if y + block_height > height {
            tracing::trace!("Band {} at row {} runs past the bottom edge", i, y);
            continue;
        }

        let band = density.slice(s![y..y + block_height, ..]);
        let Some(cols) = band.mean_axis(Axis(0)) else {
            continue;
        };
        let left = first_crossing(cols.view(), tuning.size_threshold);
        let right = last_crossing(cols.view(), tuning.size_threshold);
        match (left, right) {
            (Some(left), Some(right)) if right > left && right - left < MIN_BAND_PIXELS as usize => {
                tracing::debug!("Band {} at row {} is only {}px wide", i, y, right - left);
            }
            (Some(left), Some(right)) if right > left => {
                bands.push(Rect::new(
                    left as u32,
                    y as u32,
                    (right - left) as u32,
                    block_height as u32,
                ));
            }
            _ => {
                tracing::debug!("Band {} at row {} has no resolvable width", i, y);
            }
        }
    }
    bands
}
