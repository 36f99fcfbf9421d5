use super::OutputSink;
use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::PathBuf;

/// Numbered PNG files (`frame_00000.png`, ...) in a directory.
pub struct PngSink {
    dir: PathBuf,
    next_index: u64,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        tracing::info!("Writing annotated frames to {}", dir.display());
        Ok(Self { dir, next_index: 0 })
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl OutputSink for PngSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        let path = self.path_for(self.next_index);
        frame
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        self.next_index += 1;
        Ok(())
    }
}
