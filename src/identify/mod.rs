//! Block-stack identification.
//!
//! A frame goes through three stages:
//! 1. [`silhouette::extract_silhouette`] isolates the stack as a filled mask.
//! 2. [`bands::segment_bands`] trims the studs and cuts the mask into one band per block.
//! 3. [`classify::classify`] averages each band's center and matches it against the palette.
//!
//! Every call is independent; nothing is cached between frames.

pub mod bands;
pub mod classify;
pub mod matcher;
pub mod silhouette;
pub mod types;

pub use types::{BlockDescriptor, BlockKey, Rect, Silhouette};

use crate::config::{ColorEntry, Config, Tuning};
use crate::error::{IdentifyError, Result};
use image::{DynamicImage, RgbImage};
use std::borrow::Cow;

/// Identify the blocks in `frame`, top of the frame first.
///
/// An empty result means nothing was detected; it is not an error.
pub fn identify_stack(
    frame: &RgbImage,
    tuning: &Tuning,
    palette: &[ColorEntry],
) -> Result<Vec<BlockDescriptor>> {
    let _span = tracing::debug_span!("identify").entered();

    if palette.is_empty() {
        return Err(IdentifyError::EmptyPalette);
    }
    tuning.validate()?;

    let Some(silhouette) = silhouette::extract_silhouette(frame, tuning.bin_threshold) else {
        tracing::debug!("No silhouette found");
        return Ok(Vec::new());
    };

    let bands = bands::segment_bands(&silhouette.mask, tuning);

    let _classify_span = tracing::debug_span!("classify").entered();
    let unit_width = tuning.nominal_unit_width();
    let blocks = bands
        .into_iter()
        .map(|band| classify::classify(frame, band, palette, unit_width))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Identified {} block(s)", blocks.len());
    Ok(blocks)
}

/// [`identify_stack`] for an arbitrary decoded image.
///
/// The image must carry exactly three color channels; 16-bit and float RGB
/// are narrowed to 8 bits first.
pub fn identify_frame(frame: &DynamicImage, config: &Config) -> Result<Vec<BlockDescriptor>> {
    let rgb = rgb_view(frame)?;
    identify_stack(&rgb, &config.tuning, &config.palette)
}

fn rgb_view(frame: &DynamicImage) -> Result<Cow<'_, RgbImage>> {
    let found = frame.color().channel_count();
    if found != 3 {
        return Err(IdentifyError::UnsupportedChannels { found });
    }
    Ok(match frame.as_rgb8() {
        Some(rgb) => Cow::Borrowed(rgb),
        None => Cow::Owned(frame.to_rgb8()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{solid_frame, tuning_with_block};
    use image::{GrayImage, RgbaImage};

    #[test]
    fn rejects_non_rgb_frames() {
        let config = Config::default();
        let gray = DynamicImage::ImageLuma8(GrayImage::new(8, 8));
        assert!(matches!(
            identify_frame(&gray, &config),
            Err(IdentifyError::UnsupportedChannels { found: 1 })
        ));

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
        assert!(matches!(
            identify_frame(&rgba, &config),
            Err(IdentifyError::UnsupportedChannels { found: 4 })
        ));
    }

    #[test]
    fn empty_palette_fails_before_detection() {
        let frame = solid_frame(32, 32, [0, 0, 0]);
        let result = identify_stack(&frame, &tuning_with_block(10, 10), &[]);
        assert!(matches!(result, Err(IdentifyError::EmptyPalette)));
    }

    #[test]
    fn blank_frame_yields_nothing() {
        let config = Config::default();
        let frame = DynamicImage::ImageRgb8(solid_frame(64, 48, [5, 5, 5]));
        assert!(identify_frame(&frame, &config).unwrap().is_empty());
    }
}
