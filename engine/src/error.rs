use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write frame to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(
        "sprite strip {path} is {width}x{height}, expected {frames} frames of {frame_width}x{frame_height}"
    )]
    SpriteSheet {
        path: PathBuf,
        width: u32,
        height: u32,
        frames: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[cfg(feature = "audio")]
    #[error("audio: {0}")]
    Audio(String),
}
