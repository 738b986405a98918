//! `PixelBuffer`: owned 8-bit pixel data with explicit stride and format, plus
//! rectangular regions (crop), pixel fill and CRC-32 fingerprinting.
use std::borrow::Cow;

use crate::core::checksum::crc32;
use crate::error::{Error, Result};
use crate::types::{PixelFormat, Position};

/// Half-open rectangle `[left, right) x [top, bottom)` in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersects the rectangle with `[0, width) x [0, height)`.
    pub fn clamp(&self, width: u32, height: u32) -> Rect {
        let left = self.left.min(width);
        let top = self.top.min(height);
        Rect {
            left,
            top,
            right: self.right.min(width).max(left),
            bottom: self.bottom.min(height).max(top),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

fn row_bytes(format: PixelFormat, width: u32) -> Result<u32> {
    (width as u64 * format.bytes_per_pixel() as u64)
        .try_into()
        .map_err(|_| Error::InvalidDimension { width, height: 0 })
}

impl PixelBuffer {
    /// Zero-filled, tightly packed buffer.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Result<Self> {
        Self::with_alignment(format, width, height, 1)
    }

    /// Zero-filled buffer whose stride is rounded up to a multiple of `alignment` bytes.
    pub fn with_alignment(
        format: PixelFormat,
        width: u32,
        height: u32,
        alignment: usize,
    ) -> Result<Self> {
        if alignment == 0 {
            return Err(Error::InvalidArgument {
                arg: "alignment",
                value: alignment.to_string(),
            });
        }
        let tight = row_bytes(format, width)? as usize;
        let stride = tight.div_ceil(alignment) * alignment;
        let stride = u32::try_from(stride).map_err(|_| Error::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: vec![0u8; stride as usize * height as usize],
        })
    }

    /// Wraps existing bytes; validates `stride >= width * bpp` and `data.len() == stride * height`.
    pub fn from_vec(
        format: PixelFormat,
        width: u32,
        height: u32,
        stride: u32,
        data: Vec<u8>,
    ) -> Result<Self> {
        let min_stride = row_bytes(format, width)?;
        if stride < min_stride {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = stride as usize * height as usize;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Wraps tightly packed bytes.
    pub fn from_packed(format: PixelFormat, width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let stride = row_bytes(format, width)?;
        Self::from_vec(format, width, height, stride, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including padding.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channel_count(&self) -> usize {
        self.format.channel_count()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel bytes of row `y`, without the stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.width as usize * self.bytes_per_pixel()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride as usize;
        let len = self.width as usize * self.bytes_per_pixel();
        &mut self.data[start..start + len]
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        let start = y as usize * self.stride as usize + x as usize * bpp;
        &self.data[start..start + bpp]
    }

    /// Pixel rows with the padding removed; borrows when already tightly packed.
    pub fn packed_data(&self) -> Cow<'_, [u8]> {
        let tight = self.width as usize * self.bytes_per_pixel();
        if tight == self.stride as usize {
            return Cow::Borrowed(&self.data);
        }
        let mut out = Vec::with_capacity(tight * self.height as usize);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        Cow::Owned(out)
    }

    /// CRC-32 over the full `stride * height` bytes.
    pub fn crc32(&self) -> u32 {
        crc32(&self.data)
    }

    /// Rectangle of `width x height` anchored at `position`, clamped to the image.
    pub fn region_at(&self, width: u32, height: u32, position: Position) -> Rect {
        let w = width.min(self.width);
        let h = height.min(self.height);
        let free_x = self.width - w;
        let free_y = self.height - h;

        let left = match position {
            Position::TopLeft | Position::MiddleLeft | Position::BottomLeft => 0,
            Position::TopCenter | Position::MiddleCenter | Position::BottomCenter => free_x / 2,
            Position::TopRight | Position::MiddleRight | Position::BottomRight => free_x,
        };
        let top = match position {
            Position::TopLeft | Position::TopCenter | Position::TopRight => 0,
            Position::MiddleLeft | Position::MiddleCenter | Position::MiddleRight => free_y / 2,
            Position::BottomLeft | Position::BottomCenter | Position::BottomRight => free_y,
        };
        Rect::new(left, top, left + w, top + h)
    }

    /// Copies the (clamped) rectangle into a new tightly packed buffer.
    pub fn region(&self, rect: Rect) -> PixelBuffer {
        let rect = rect.clamp(self.width, self.height);
        let bpp = self.bytes_per_pixel();
        let row_len = rect.width() as usize * bpp;
        let mut data = Vec::with_capacity(row_len * rect.height() as usize);
        for y in rect.top..rect.bottom {
            let start = y as usize * self.stride as usize + rect.left as usize * bpp;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        PixelBuffer {
            width: rect.width(),
            height: rect.height(),
            stride: row_len as u32,
            format: self.format,
            data,
        }
    }

    /// Sets every pixel inside the (clamped) rectangle to `pixel`.
    pub fn fill_pixel(&mut self, rect: Rect, pixel: &[u8]) -> Result<()> {
        let bpp = self.bytes_per_pixel();
        if pixel.len() != bpp {
            return Err(Error::ChannelCountMismatch {
                expected: bpp,
                actual: pixel.len(),
            });
        }
        let rect = rect.clamp(self.width, self.height);
        let stride = self.stride as usize;
        for y in rect.top..rect.bottom {
            let start = y as usize * stride + rect.left as usize * bpp;
            let end = start + rect.width() as usize * bpp;
            for dst in self.data[start..end].chunks_exact_mut(bpp) {
                dst.copy_from_slice(pixel);
            }
        }
        Ok(())
    }

    /// Sets the whole image to `pixel`.
    pub fn fill(&mut self, pixel: &[u8]) -> Result<()> {
        self.fill_pixel(Rect::new(0, 0, self.width, self.height), pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(format: PixelFormat, width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::new(format, width, height).unwrap();
        for y in 0..height {
            for (i, b) in img.row_mut(y).iter_mut().enumerate() {
                *b = (y as usize * 16 + i) as u8;
            }
        }
        img
    }

    #[test]
    fn from_vec_validates_stride_and_length() {
        assert!(matches!(
            PixelBuffer::from_vec(PixelFormat::Bgr24, 4, 2, 11, vec![0; 22]),
            Err(Error::InvalidDimension {
                width: 4,
                height: 2
            })
        ));
        assert!(matches!(
            PixelBuffer::from_vec(PixelFormat::Bgr24, 4, 2, 16, vec![0; 31]),
            Err(Error::ShapeMismatch {
                expected: 32,
                actual: 31
            })
        ));
        let img = PixelBuffer::from_vec(PixelFormat::Bgr24, 4, 2, 16, vec![0; 32]).unwrap();
        assert_eq!(img.row(1).len(), 12);
    }

    #[test]
    fn alignment_pads_stride() {
        let img = PixelBuffer::with_alignment(PixelFormat::Bgr24, 5, 3, 16).unwrap();
        assert_eq!(img.stride(), 16);
        assert_eq!(img.data().len(), 48);
        assert_eq!(img.packed_data().len(), 45);
    }

    #[test]
    fn region_at_center() {
        let img = PixelBuffer::new(PixelFormat::Gray8, 120, 90).unwrap();
        let rect = img.region_at(60, 45, Position::MiddleCenter);
        assert_eq!(rect, Rect::new(30, 22, 90, 67));
        let rect = img.region_at(200, 10, Position::BottomRight);
        assert_eq!(rect, Rect::new(0, 80, 120, 90));
    }

    #[test]
    fn region_copies_clamped_rows() {
        let img = gradient(PixelFormat::Gray8, 8, 8);
        let crop = img.region(Rect::new(6, 6, 20, 20));
        assert_eq!((crop.width(), crop.height()), (2, 2));
        assert_eq!(crop.pixel(0, 0), img.pixel(6, 6));
        assert_eq!(crop.pixel(1, 1), img.pixel(7, 7));

        let empty = img.region(Rect::new(10, 10, 20, 20));
        assert!(empty.is_empty());
        assert!(empty.data().is_empty());
    }

    #[test]
    fn fill_pixel_touches_only_rect() {
        let mut img = PixelBuffer::with_alignment(PixelFormat::Bgr24, 4, 4, 16).unwrap();
        img.fill_pixel(Rect::new(1, 1, 3, 3), &[0, 0, 255]).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let inside = (1..3).contains(&x) && (1..3).contains(&y);
                let expected: &[u8] = if inside { &[0, 0, 255] } else { &[0, 0, 0] };
                assert_eq!(img.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
        // padding bytes untouched
        assert!(img.data()[12..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_out_of_bounds_is_noop() {
        let mut img = PixelBuffer::new(PixelFormat::Bgr24, 4, 4).unwrap();
        let before = img.crc32();
        img.fill_pixel(Rect::new(200, 200, 400, 400), &[0, 0, 255]).unwrap();
        assert_eq!(img.crc32(), before);
    }

    #[test]
    fn fill_rejects_wrong_pixel_size() {
        let mut img = PixelBuffer::new(PixelFormat::Bgra32, 2, 2).unwrap();
        assert!(matches!(
            img.fill(&[1, 2, 3]),
            Err(Error::ChannelCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
