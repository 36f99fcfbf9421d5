mod loopback;
mod overlay;
mod png;

pub use loopback::V4L2Output;
pub use overlay::{block_label, render_overlay};
pub use png::PngSink;

use anyhow::Result;
use image::RgbImage;

/// Trait for output destinations
pub trait OutputSink {
    /// Write a frame to the output
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;
}
