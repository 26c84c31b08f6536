use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no frames have been recorded")]
    NoFrames,

    #[error("frame buffer holds {len} bytes, expected {width}x{height} RGBA")]
    InvalidFrame { width: u32, height: u32, len: usize },

    #[error("frame {index} requested but only {len} recorded")]
    FrameOutOfRange { index: usize, len: usize },

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
