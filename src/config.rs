//! Palette, tuning and instruction table, persisted as JSON.

use crate::error::{ConfigError, IdentifyError};
use crate::identify::types::MIN_BAND_PIXELS;
use crate::identify::BlockKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named reference color. Channels are stored in RGB order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub name: String,
    pub rgb: [u8; 3],
}

impl ColorEntry {
    pub fn new(name: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            rgb,
        }
    }
}

/// Numeric knobs for one identification pass.
///
/// `block_height` and `block_width` are measured on the full-resolution camera
/// image; the identifier works on frames scaled by `camera_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Row density (0-255) a mask row must reach to count as block body.
    pub stud_threshold: u8,
    /// Column density (0-255) a band column must reach to count as block body.
    pub size_threshold: u8,
    /// Binarization level for the blended lightness/saturation channel.
    pub bin_threshold: u8,
    pub camera_width: u32,
    pub camera_height: u32,
    pub camera_ratio: f64,
    pub block_height: u32,
    pub block_width: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            stud_threshold: 40,
            size_threshold: 245,
            bin_threshold: 80,
            camera_width: 1280,
            camera_height: 720,
            camera_ratio: 0.5,
            block_height: 102,
            block_width: 150,
        }
    }
}

impl Tuning {
    /// Height of one block in frame pixels.
    pub fn nominal_block_height(&self) -> u32 {
        (f64::from(self.block_height) * self.camera_ratio) as u32
    }

    /// Width of one stud unit in frame pixels.
    pub fn nominal_unit_width(&self) -> u32 {
        (f64::from(self.block_width) * self.camera_ratio) as u32
    }

    /// Frame size after scaling the camera image by `camera_ratio`.
    pub fn scaled_frame_size(&self) -> (u32, u32) {
        (
            (f64::from(self.camera_width) * self.camera_ratio) as u32,
            (f64::from(self.camera_height) * self.camera_ratio) as u32,
        )
    }

    pub fn validate(&self) -> Result<(), IdentifyError> {
        if !(self.camera_ratio.is_finite() && self.camera_ratio > 0.0) {
            return Err(IdentifyError::InvalidTuning(format!(
                "camera_ratio must be positive, got {}",
                self.camera_ratio
            )));
        }
        if self.nominal_block_height() < MIN_BAND_PIXELS {
            return Err(IdentifyError::InvalidTuning(format!(
                "block_height scales to {}px, need at least {}",
                self.nominal_block_height(),
                MIN_BAND_PIXELS
            )));
        }
        if self.nominal_unit_width() == 0 {
            return Err(IdentifyError::InvalidTuning(
                "block_width scales to zero pixels".to_string(),
            ));
        }
        Ok(())
    }
}

/// One row of the block -> instruction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionRule {
    pub color: String,
    pub width: u32,
    pub id: String,
    #[serde(default = "empty_param")]
    pub param: serde_json::Value,
}

fn empty_param() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl InstructionRule {
    pub fn new(color: impl Into<String>, width: u32, id: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width,
            id: id.into(),
            param: empty_param(),
        }
    }

    pub fn key(&self) -> BlockKey {
        BlockKey {
            color: self.color.clone(),
            width_units: self.width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub palette: Vec<ColorEntry>,
    #[serde(default)]
    pub instructions: Vec<InstructionRule>,
    #[serde(default)]
    pub tuning: Tuning,
    /// Controller receiving order payloads, as `host:port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: vec![
                ColorEntry::new("red", [200, 30, 40]),
                ColorEntry::new("green", [40, 140, 60]),
                ColorEntry::new("white", [235, 235, 230]),
                ColorEntry::new("blue", [30, 70, 180]),
                ColorEntry::new("aqua", [70, 170, 210]),
                ColorEntry::new("yellow", [240, 200, 40]),
            ],
            instructions: vec![
                InstructionRule::new("red", 1, "turn_left"),
                InstructionRule::new("red", 2, "turn_right"),
                InstructionRule::new("green", 2, "forward"),
                InstructionRule::new("blue", 2, "backward"),
                InstructionRule::new("yellow", 1, "jump"),
                InstructionRule::new("white", 3, "wait"),
            ],
            tuning: Tuning::default(),
            server: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(
            "Loaded config from {}: {} colors, {} instructions",
            path.display(),
            config.palette.len(),
            config.instructions.len()
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, data).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), IdentifyError> {
        if self.palette.is_empty() {
            return Err(IdentifyError::EmptyPalette);
        }
        self.tuning.validate()
    }

    /// Instruction rule registered for `key`, if any. First match wins.
    pub fn instruction_for(&self, key: &BlockKey) -> Option<&InstructionRule> {
        crate::orders::lookup(key, &self.instructions)
    }
}
