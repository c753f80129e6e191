use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the fallible edges of the canvas core.
///
/// Pointer handling, rendering and history never produce these; they degrade
/// to no-ops instead. Only bitmap decoding and file access can fail.
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("failed to decode image {uri}: {source}")]
    Decode {
        uri: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read image file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while loading or saving a [`crate::CanvasConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid config data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for config persistence
pub type ConfigResult<T> = Result<T, ConfigError>;
