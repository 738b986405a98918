//! Crate-level error type and `Result` alias for structured error handling.
//! Shape and format validation failures carry the dimensions/format involved;
//! decoder failures are passed through unchanged from the `image` crate.
use thiserror::Error;

use crate::types::PixelFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Unsupported pixel format {format} for {operation}")]
    UnsupportedFormat {
        format: PixelFormat,
        operation: &'static str,
    },

    #[error("Shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub fn encode<E: std::fmt::Display>(e: E) -> Self {
        Error::Encode(e.to_string())
    }

    pub(crate) fn unsupported(format: PixelFormat, operation: &'static str) -> Self {
        Error::UnsupportedFormat { format, operation }
    }
}
