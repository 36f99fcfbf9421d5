//! Synthetic frames and masks for unit tests.

use crate::config::Tuning;
use image::{GrayImage, Luma, Rgb, RgbImage};

pub(crate) fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Paint a filled rectangle, clipped to the frame.
pub(crate) fn fill_rect(frame: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for yy in y..(y + h).min(frame.height()) {
        for xx in x..(x + w).min(frame.width()) {
            frame.put_pixel(xx, yy, Rgb(rgb));
        }
    }
}

/// Set a rectangle of a mask to foreground (255).
pub(crate) fn fill_mask(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
    for yy in y..(y + h).min(mask.height()) {
        for xx in x..(x + w).min(mask.width()) {
            mask.put_pixel(xx, yy, Luma([255]));
        }
    }
}

/// Default thresholds with the block size given directly in frame pixels.
pub(crate) fn tuning_with_block(block_height: u32, block_width: u32) -> Tuning {
    Tuning {
        camera_ratio: 1.0,
        block_height,
        block_width,
        ..Tuning::default()
    }
}
