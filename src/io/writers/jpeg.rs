use jpeg_encoder::{ColorType, Encoder};

use crate::core::image::PixelBuffer;
use crate::error::{Error, Result};
use crate::types::PixelFormat;

fn color_type(format: PixelFormat) -> Result<ColorType> {
    match format {
        PixelFormat::Gray8 => Ok(ColorType::Luma),
        PixelFormat::Bgr24 => Ok(ColorType::Bgr),
        PixelFormat::Rgb24 => Ok(ColorType::Rgb),
        PixelFormat::Bgra32 => Ok(ColorType::Bgra),
        PixelFormat::Rgba32 => Ok(ColorType::Rgba),
        PixelFormat::Uv16 | PixelFormat::Float32 => Err(Error::unsupported(format, "jpeg encode")),
    }
}

pub fn encode_jpeg(image: &PixelBuffer, quality: u8) -> Result<Vec<u8>> {
    let color = color_type(image.format())?;
    let (cols, rows) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(c), Ok(r)) if c > 0 && r > 0 => (c, r),
        _ => {
            return Err(Error::InvalidDimension {
                width: image.width(),
                height: image.height(),
            });
        }
    };

    let mut out = Vec::new();
    let encoder = Encoder::new(&mut out, quality.clamp(1, 100));
    encoder
        .encode(&image.packed_data(), cols, rows, color)
        .map_err(Error::encode)?;
    Ok(out)
}
