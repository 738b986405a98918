use rayon::prelude::*;
use tracing::debug;

use crate::core::image::PixelBuffer;
use crate::core::processing::normalize::{NormalizationRange, Normalizer};
use crate::core::settings;
use crate::error::{Error, Result};
use crate::types::TensorLayout;

/// Number of floats a packed `width x height x channels` tensor holds.
pub fn tensor_len(width: u32, height: u32, channels: usize) -> usize {
    width as usize * height as usize * channels
}

/// Flat offset of `(channel, y, x)` in a packed tensor.
#[inline]
pub fn tensor_index(
    layout: TensorLayout,
    width: u32,
    height: u32,
    channels: usize,
    channel: usize,
    y: u32,
    x: u32,
) -> usize {
    let (w, h) = (width as usize, height as usize);
    let (y, x) = (y as usize, x as usize);
    match layout {
        TensorLayout::ChannelMajor => (channel * h + y) * w + x,
        TensorLayout::PixelMajor => (y * w + x) * channels + channel,
    }
}

/// An allocated, packed tensor with batch size 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub layout: TensorLayout,
}

impl Tensor {
    pub fn zeros(width: u32, height: u32, channels: usize, layout: TensorLayout) -> Self {
        Self {
            data: vec![0.0; tensor_len(width, height, channels)],
            width,
            height,
            channels,
            layout,
        }
    }

    /// `[1, C, H, W]` for ChannelMajor, `[1, H, W, C]` for PixelMajor.
    pub fn shape(&self) -> [usize; 4] {
        let (w, h, c) = (self.width as usize, self.height as usize, self.channels);
        match self.layout {
            TensorLayout::ChannelMajor => [1, c, h, w],
            TensorLayout::PixelMajor => [1, h, w, c],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn at(&self, channel: usize, y: u32, x: u32) -> f32 {
        self.data[tensor_index(
            self.layout,
            self.width,
            self.height,
            self.channels,
            channel,
            y,
            x,
        )]
    }
}

/// Normalizes every channel of `src` into `dst` using `layout`.
///
/// All checks run before the first write: the format must store one byte per
/// channel, `range` must cover `src.channel_count()` channels and `dst` must hold
/// exactly `width * height * channels` floats. Only `dst` is written, and only the
/// pixel bytes of each row of `src` are read (stride padding is skipped).
pub fn pack(
    src: &PixelBuffer,
    range: &NormalizationRange,
    layout: TensorLayout,
    dst: &mut [f32],
) -> Result<()> {
    pack_with_mode(src, range, layout, dst, settings::fast_mode())
}

pub(crate) fn pack_with_mode(
    src: &PixelBuffer,
    range: &NormalizationRange,
    layout: TensorLayout,
    dst: &mut [f32],
    fast: bool,
) -> Result<()> {
    if !src.format().has_byte_channels() {
        return Err(Error::unsupported(src.format(), "pack"));
    }
    let channels = src.channel_count();
    range.check_channels(channels)?;
    let expected = tensor_len(src.width(), src.height(), channels);
    if dst.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: dst.len(),
        });
    }
    if expected == 0 {
        return Ok(());
    }

    debug!(
        "Packing {} {}x{} into {} ({} floats, fast={})",
        src.format(),
        src.width(),
        src.height(),
        layout,
        expected,
        fast
    );

    let normalizer = Normalizer::new(range, fast);
    let width = src.width() as usize;
    let height = src.height() as usize;

    settings::install(|| match layout {
        TensorLayout::ChannelMajor => {
            // one chunk per (channel, row)
            dst.par_chunks_mut(width)
                .enumerate()
                .for_each(|(i, out)| {
                    let (c, y) = (i / height, i % height);
                    let row = src.row(y as u32);
                    for (o, px) in out.iter_mut().zip(row.chunks_exact(channels)) {
                        *o = normalizer.apply(c, px[c]);
                    }
                });
        }
        TensorLayout::PixelMajor => {
            dst.par_chunks_mut(width * channels)
                .enumerate()
                .for_each(|(y, out)| {
                    let row = src.row(y as u32);
                    for (o, px) in out.chunks_exact_mut(channels).zip(row.chunks_exact(channels)) {
                        for c in 0..channels {
                            o[c] = normalizer.apply(c, px[c]);
                        }
                    }
                });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelFormat;

    fn sample() -> PixelBuffer {
        // 3x2 Bgr24 with 4 bytes of row padding
        let mut img = PixelBuffer::with_alignment(PixelFormat::Bgr24, 3, 2, 13).unwrap();
        for y in 0..2 {
            for (i, b) in img.row_mut(y).iter_mut().enumerate() {
                *b = (y as usize * 9 + i) as u8 * 10;
            }
        }
        img
    }

    #[test]
    fn layouts_index_same_values() {
        let img = sample();
        let range = NormalizationRange::uniform(0.0, 255.0, 3);
        let mut nchw = vec![0f32; 18];
        let mut nhwc = vec![0f32; 18];
        pack_with_mode(&img, &range, TensorLayout::ChannelMajor, &mut nchw, false).unwrap();
        pack_with_mode(&img, &range, TensorLayout::PixelMajor, &mut nhwc, false).unwrap();

        for c in 0..3 {
            for y in 0..2 {
                for x in 0..3 {
                    let raw = img.pixel(x, y)[c] as f32;
                    let a = nchw[tensor_index(TensorLayout::ChannelMajor, 3, 2, 3, c, y, x)];
                    let b = nhwc[tensor_index(TensorLayout::PixelMajor, 3, 2, 3, c, y, x)];
                    assert!((a - raw).abs() < 1e-4);
                    assert_eq!(a, b);
                }
            }
        }
        for (got, want) in nchw[0..3].iter().zip([0.0, 30.0, 60.0]) {
            assert!((got - want).abs() < 1e-4);
        }
        for (got, want) in nhwc[0..3].iter().zip([0.0, 10.0, 20.0]) {
            assert!((got - want).abs() < 1e-4);
        }
    }

    #[test]
    fn short_destination_untouched() {
        let img = sample();
        let range = NormalizationRange::unit(3);
        let mut dst = vec![-7.0f32; 17];
        let err = pack(&img, &range, TensorLayout::PixelMajor, &mut dst).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 18,
                actual: 17
            }
        ));
        assert!(dst.iter().all(|&v| v == -7.0));
    }

    #[test]
    fn range_arity_checked() {
        let img = sample();
        let range = NormalizationRange::unit(4);
        let mut dst = vec![0f32; 18];
        assert!(matches!(
            pack(&img, &range, TensorLayout::ChannelMajor, &mut dst),
            Err(Error::ChannelCountMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn float_source_unsupported() {
        let img = PixelBuffer::new(PixelFormat::Float32, 2, 2).unwrap();
        let mut dst = vec![0f32; 4];
        assert!(matches!(
            pack(&img, &NormalizationRange::unit(1), TensorLayout::PixelMajor, &mut dst),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn tensor_shape_follows_layout() {
        let t = Tensor::zeros(4, 2, 3, TensorLayout::ChannelMajor);
        assert_eq!(t.shape(), [1, 3, 2, 4]);
        let t = Tensor::zeros(4, 2, 3, TensorLayout::PixelMajor);
        assert_eq!(t.shape(), [1, 2, 4, 3]);
        assert_eq!(t.len(), 24);
    }
}
