//! Encoding collaborators: JPEG through `jpeg-encoder`, PNG through `image`.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::core::image::PixelBuffer;
use crate::error::Result;
use crate::types::ImageFileFormat;

pub mod jpeg;
pub mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Encodes `image`; `quality` (1..=100) applies to JPEG only.
pub fn encode(image: &PixelBuffer, format: ImageFileFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        ImageFileFormat::Jpeg => encode_jpeg(image, quality),
        ImageFileFormat::Png => encode_png(image),
    }
}

pub fn save<P: AsRef<Path>>(
    image: &PixelBuffer,
    output: P,
    format: ImageFileFormat,
    quality: u8,
) -> Result<()> {
    let bytes = encode(image, format, quality)?;
    let file = File::create(output.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;
    info!(
        "Saved {}x{} {} to {:?}",
        image.width(),
        image.height(),
        format,
        output.as_ref()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::decode::{decode, load};
    use crate::types::PixelFormat;

    fn checker(format: PixelFormat) -> PixelBuffer {
        let mut img = PixelBuffer::with_alignment(format, 16, 8, 64).unwrap();
        let bpp = format.bytes_per_pixel();
        for y in 0..8 {
            for (i, b) in img.row_mut(y).iter_mut().enumerate() {
                *b = if ((i / bpp) / 4 + y as usize / 4) % 2 == 0 { 230 } else { 20 };
            }
        }
        img
    }

    #[test]
    fn png_roundtrip_is_lossless() {
        for format in [PixelFormat::Gray8, PixelFormat::Bgr24, PixelFormat::Rgba32] {
            let img = checker(format);
            let bytes = encode(&img, ImageFileFormat::Png, 100).unwrap();
            let back = decode(&bytes, Some(format)).unwrap();
            assert_eq!(back.packed_data(), img.packed_data(), "{}", format);
        }
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let img = checker(PixelFormat::Bgr24);
        let bytes = encode(&img, ImageFileFormat::Jpeg, 85).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let back = decode(&bytes, None).unwrap();
        assert_eq!((back.width(), back.height()), (16, 8));
        assert_eq!(back.format(), PixelFormat::Bgr24);
    }

    #[test]
    fn unsupported_and_empty() {
        let uv = PixelBuffer::new(PixelFormat::Uv16, 2, 2).unwrap();
        assert!(encode(&uv, ImageFileFormat::Jpeg, 85).is_err());
        let empty = PixelBuffer::new(PixelFormat::Gray8, 0, 0).unwrap();
        assert!(encode(&empty, ImageFileFormat::Png, 85).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        let img = checker(PixelFormat::Bgr24);
        save(&img, &path, ImageFileFormat::Png, 100).unwrap();
        let back = load(&path, None).unwrap();
        assert_eq!(back.packed_data(), img.packed_data());
    }
}
