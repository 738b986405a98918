//! Shared types and enums used across tensorprep.
//! Includes `PixelFormat`, `ResizeMethod`, `TensorLayout`, `Position` and
//! `ImageFileFormat`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Debug, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    /// Two interleaved 8-bit planes (U, V).
    Uv16,
    Bgr24,
    Bgra32,
    Rgb24,
    Rgba32,
    /// Single 32-bit float channel; has no 8-bit per-channel layout.
    Float32,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Uv16 => 2,
            PixelFormat::Bgr24 | PixelFormat::Rgb24 => 3,
            PixelFormat::Bgra32 | PixelFormat::Rgba32 | PixelFormat::Float32 => 4,
        }
    }

    pub fn channel_count(self) -> usize {
        match self {
            PixelFormat::Gray8 | PixelFormat::Float32 => 1,
            PixelFormat::Uv16 => 2,
            PixelFormat::Bgr24 | PixelFormat::Rgb24 => 3,
            PixelFormat::Bgra32 | PixelFormat::Rgba32 => 4,
        }
    }

    /// True when every channel is stored as one byte, i.e. `bytes_per_pixel == channel_count`.
    pub fn has_byte_channels(self) -> bool {
        !matches!(self, PixelFormat::Float32)
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PixelFormat::Gray8 => "Gray8",
            PixelFormat::Uv16 => "Uv16",
            PixelFormat::Bgr24 => "Bgr24",
            PixelFormat::Bgra32 => "Bgra32",
            PixelFormat::Rgb24 => "Rgb24",
            PixelFormat::Rgba32 => "Rgba32",
            PixelFormat::Float32 => "Float32",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ResizeMethod {
    Nearest,
    Bilinear,
    /// Box filter over the source footprint; the usual choice for down-sampling.
    Area,
    Bicubic,
    Lanczos3,
}

impl std::fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeMethod::Nearest => write!(f, "Nearest"),
            ResizeMethod::Bilinear => write!(f, "Bilinear"),
            ResizeMethod::Area => write!(f, "Area"),
            ResizeMethod::Bicubic => write!(f, "Bicubic"),
            ResizeMethod::Lanczos3 => write!(f, "Lanczos3"),
        }
    }
}

/// Memory order of the packed tensor.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum TensorLayout {
    /// Channel, then row, then column (NCHW).
    #[value(name = "nchw")]
    #[serde(rename = "nchw")]
    ChannelMajor,
    /// Row, then column, then channel (NHWC).
    #[value(name = "nhwc")]
    #[serde(rename = "nhwc")]
    PixelMajor,
}

impl std::fmt::Display for TensorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TensorLayout::ChannelMajor => write!(f, "NCHW"),
            TensorLayout::PixelMajor => write!(f, "NHWC"),
        }
    }
}

/// Anchor of a sub-region inside an image.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ImageFileFormat {
    Jpeg, // Lossy
    Png,
}

impl ImageFileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFileFormat::Jpeg => "jpg",
            ImageFileFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ImageFileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFileFormat::Jpeg => write!(f, "JPEG"),
            ImageFileFormat::Png => write!(f, "PNG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_layouts() {
        assert_eq!(PixelFormat::Bgr24.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Bgra32.channel_count(), 4);
        assert_eq!(PixelFormat::Uv16.channel_count(), 2);
        assert_eq!(PixelFormat::Float32.bytes_per_pixel(), 4);
        assert!(!PixelFormat::Float32.has_byte_channels());
        assert!(PixelFormat::Gray8.has_byte_channels());
    }

    #[test]
    fn layout_serde_names() {
        let json = serde_json::to_string(&TensorLayout::PixelMajor).unwrap();
        assert_eq!(json, "\"nhwc\"");
        let back: TensorLayout = serde_json::from_str("\"nchw\"").unwrap();
        assert_eq!(back, TensorLayout::ChannelMajor);
    }

    #[test]
    fn file_extensions() {
        assert_eq!(ImageFileFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFileFormat::Png.extension(), "png");
    }
}
