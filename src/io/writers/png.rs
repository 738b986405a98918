use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::core::image::PixelBuffer;
use crate::error::{Error, Result};
use crate::io::decode::swap_red_blue;
use crate::types::PixelFormat;

/// Lossless PNG; BGR(A) sources are reordered to RGB(A) first.
pub fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>> {
    if image.is_empty() {
        return Err(Error::InvalidDimension {
            width: image.width(),
            height: image.height(),
        });
    }
    let mut data = image.packed_data().into_owned();
    let color = match image.format() {
        PixelFormat::Gray8 => ExtendedColorType::L8,
        PixelFormat::Rgb24 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba32 => ExtendedColorType::Rgba8,
        PixelFormat::Bgr24 => {
            swap_red_blue(&mut data, 3);
            ExtendedColorType::Rgb8
        }
        PixelFormat::Bgra32 => {
            swap_red_blue(&mut data, 4);
            ExtendedColorType::Rgba8
        }
        format @ (PixelFormat::Uv16 | PixelFormat::Float32) => {
            return Err(Error::unsupported(format, "png encode"));
        }
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&data, image.width(), image.height(), color)
        .map_err(Error::encode)?;
    Ok(out)
}
