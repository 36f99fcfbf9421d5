use super::FrameSource;
use anyhow::{Context, Result};
use image::DynamicImage;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Frames read from image files, one per capture, in the given order.
pub struct StillImageSource {
    pending: VecDeque<PathBuf>,
    last_size: (u32, u32),
}

impl StillImageSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        tracing::info!("Reading {} still image(s)", paths.len());
        Self {
            pending: paths.into(),
            last_size: (0, 0),
        }
    }
}

impl FrameSource for StillImageSource {
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        tracing::debug!("Loading {}", path.display());
        let image =
            image::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        self.last_size = (image.width(), image.height());
        Ok(Some(image))
    }

    fn resolution(&self) -> (u32, u32) {
        self.last_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn yields_each_file_once() {
        let path = std::env::temp_dir().join(format!("brickstack-still-{}.png", std::process::id()));
        RgbImage::new(12, 7).save(&path).unwrap();

        let mut source = StillImageSource::new(vec![path.clone()]);
        let frame = source.capture_frame().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (12, 7));
        assert_eq!(source.resolution(), (12, 7));
        assert!(source.capture_frame().unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut source = StillImageSource::new(vec![PathBuf::from("/nonexistent/brickstack.png")]);
        assert!(source.capture_frame().is_err());
    }
}
