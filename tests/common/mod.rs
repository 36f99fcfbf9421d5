#![allow(dead_code)]

use brickstack::{ColorEntry, Tuning};
use image::{Rgb, RgbImage};

pub const RED: [u8; 3] = [220, 20, 20];
pub const GREEN: [u8; 3] = [20, 180, 40];
pub const BLUE: [u8; 3] = [30, 40, 220];
pub const YELLOW: [u8; 3] = [230, 200, 30];

pub fn palette() -> Vec<ColorEntry> {
    vec![
        ColorEntry::new("red", [200, 30, 30]),
        ColorEntry::new("green", [30, 160, 50]),
        ColorEntry::new("blue", [40, 60, 200]),
        ColorEntry::new("yellow", [240, 210, 40]),
    ]
}

/// 30px blocks, 40px per unit, on frames that need no scaling.
pub fn tuning() -> Tuning {
    Tuning {
        size_threshold: 200,
        camera_ratio: 1.0,
        block_height: 30,
        block_width: 40,
        ..Tuning::default()
    }
}

pub fn fill_rect(frame: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for yy in y..(y + h).min(frame.height()) {
        for xx in x..(x + w).min(frame.width()) {
            frame.put_pixel(xx, yy, Rgb(rgb));
        }
    }
}

/// Blocks `(width, color)` stacked upward from `base_y`, centered on `center_x`.
/// The first entry is the bottom block.
pub fn stack_frame(
    width: u32,
    height: u32,
    center_x: u32,
    base_y: u32,
    block_height: u32,
    blocks: &[(u32, [u8; 3])],
) -> RgbImage {
    let mut frame = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    for (i, &(block_width, color)) in blocks.iter().enumerate() {
        let y = base_y - block_height * (i as u32 + 1);
        fill_rect(&mut frame, center_x - block_width / 2, y, block_width, block_height, color);
    }
    frame
}
