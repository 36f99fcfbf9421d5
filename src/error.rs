use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an identification pass before any geometry is computed.
///
/// Sparse or missing detections are never reported here; they show up as an
/// empty (or shorter) descriptor list instead.
#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("frame must have exactly 3 color channels, found {found}")]
    UnsupportedChannels { found: u8 },

    #[error("palette is empty, no color to classify against")]
    EmptyPalette,

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Errors raised while loading, saving or validating a [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config for {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] IdentifyError),
}

pub type Result<T, E = IdentifyError> = std::result::Result<T, E>;
