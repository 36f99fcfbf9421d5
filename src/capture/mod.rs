mod still;
mod webcam;

pub use still::StillImageSource;
pub use webcam::WebcamCapture;

use crate::config::Tuning;
use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;

/// Trait for frame sources
pub trait FrameSource {
    /// Capture a single frame, or `None` once the source is exhausted
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);
}

/// Size of a frame from a source delivering `source` after [`prepare_frame`].
///
/// A source that has not reported a size yet, `(0, 0)`, is assumed to deliver
/// the tuned camera resolution at working scale.
pub fn working_size(source: (u32, u32), tuning: &Tuning, prescaled: bool, rotate: bool) -> (u32, u32) {
    let (width, height) = match (source, prescaled) {
        ((0, 0), _) => tuning.scaled_frame_size(),
        (size, true) => size,
        ((width, height), false) => scale_size(width, height, tuning.camera_ratio),
    };
    if rotate {
        (height, width)
    } else {
        (width, height)
    }
}

fn scale_size(width: u32, height: u32, ratio: f64) -> (u32, u32) {
    (
        ((f64::from(width) * ratio) as u32).max(1),
        ((f64::from(height) * ratio) as u32).max(1),
    )
}

/// Bring a captured frame to the working scale of the identifier.
///
/// The frame is shrunk by `tuning.camera_ratio` (unless `prescaled`) and,
/// for a camera mounted sideways, turned 90 degrees counter-clockwise so the
/// stack stands upright.
pub fn prepare_frame(
    frame: DynamicImage,
    tuning: &Tuning,
    prescaled: bool,
    rotate: bool,
) -> DynamicImage {
    let _span = tracing::debug_span!("prepare").entered();

    let frame = if prescaled || tuning.camera_ratio == 1.0 {
        frame
    } else {
        let (width, height) = scale_size(frame.width(), frame.height(), tuning.camera_ratio);
        frame.resize_exact(width, height, FilterType::Triangle)
    };

    if rotate {
        frame.rotate270()
    } else {
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn frame_is_scaled_by_camera_ratio() {
        let tuning = Tuning::default();
        let frame = DynamicImage::ImageRgb8(RgbImage::new(1280, 720));
        let prepared = prepare_frame(frame, &tuning, false, false);
        assert_eq!((prepared.width(), prepared.height()), tuning.scaled_frame_size());
    }

    #[test]
    fn prescaled_frame_keeps_size() {
        let frame = DynamicImage::ImageRgb8(RgbImage::new(64, 32));
        let prepared = prepare_frame(frame, &Tuning::default(), true, false);
        assert_eq!((prepared.width(), prepared.height()), (64, 32));
    }

    #[test]
    fn working_size_matches_prepared_frame() {
        let tuning = Tuning::default();
        for (prescaled, rotate) in [(false, false), (false, true), (true, false), (true, true)] {
            let frame = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
            let prepared = prepare_frame(frame, &tuning, prescaled, rotate);
            assert_eq!(
                working_size((640, 480), &tuning, prescaled, rotate),
                (prepared.width(), prepared.height())
            );
        }
    }

    #[test]
    fn unknown_source_size_uses_tuned_camera() {
        let tuning = Tuning::default();
        assert_eq!(
            working_size((0, 0), &tuning, false, false),
            tuning.scaled_frame_size()
        );
        assert_eq!(
            working_size((0, 0), &tuning, true, false),
            tuning.scaled_frame_size()
        );
        assert_eq!(working_size((0, 0), &tuning, false, true), (360, 640));
    }

    #[test]
    fn rotation_turns_counter_clockwise() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(3, 0, Rgb([255, 0, 0]));
        let prepared = prepare_frame(DynamicImage::ImageRgb8(img), &Tuning::default(), true, true);
        let rgb = prepared.to_rgb8();
        assert_eq!(rgb.dimensions(), (2, 4));
        // top-right corner ends up top-left
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }
}
