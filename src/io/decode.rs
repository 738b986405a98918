//! Decoding collaborator: turns encoded image bytes into a `PixelBuffer` via the
//! `image` crate. Decoder errors are passed through unchanged as `Error::Decode`.
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::core::image::PixelBuffer;
use crate::error::{Error, Result};
use crate::types::PixelFormat;

/// Swaps the first and third byte of every `bpp`-sized pixel (RGB <-> BGR).
pub(crate) fn swap_red_blue(data: &mut [u8], bpp: usize) {
    for px in data.chunks_exact_mut(bpp) {
        px.swap(0, 2);
    }
}

/// Format chosen when the caller does not request one: luma stays gray,
/// anything with alpha becomes Bgra32, everything else Bgr24.
fn native_format(image: &DynamicImage) -> PixelFormat {
    let color = image.color();
    if color.has_alpha() {
        PixelFormat::Bgra32
    } else if color.channel_count() == 1 {
        PixelFormat::Gray8
    } else {
        PixelFormat::Bgr24
    }
}

fn from_dynamic(image: DynamicImage, format: Option<PixelFormat>) -> Result<PixelBuffer> {
    let target = format.unwrap_or_else(|| native_format(&image));
    let (width, height) = (image.width(), image.height());
    let data = match target {
        PixelFormat::Gray8 => image.into_luma8().into_raw(),
        PixelFormat::Rgb24 => image.into_rgb8().into_raw(),
        PixelFormat::Rgba32 => image.into_rgba8().into_raw(),
        PixelFormat::Bgr24 => {
            let mut raw = image.into_rgb8().into_raw();
            swap_red_blue(&mut raw, 3);
            raw
        }
        PixelFormat::Bgra32 => {
            let mut raw = image.into_rgba8().into_raw();
            swap_red_blue(&mut raw, 4);
            raw
        }
        PixelFormat::Uv16 | PixelFormat::Float32 => {
            return Err(Error::unsupported(target, "decode"));
        }
    };
    debug!("Decoded {}x{} as {}", width, height, target);
    PixelBuffer::from_packed(target, width, height, data)
}

/// Decodes in-memory JPEG/PNG bytes, converting to `format` when given.
pub fn decode(bytes: &[u8], format: Option<PixelFormat>) -> Result<PixelBuffer> {
    let image = image::load_from_memory(bytes)?;
    from_dynamic(image, format)
}

/// Reads and decodes an image file.
pub fn load<P: AsRef<Path>>(path: P, format: Option<PixelFormat>) -> Result<PixelBuffer> {
    let bytes = std::fs::read(path.as_ref())?;
    decode(&bytes, format)
}
