use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use rayon::prelude::*;
use tracing::debug;

use crate::core::image::PixelBuffer;
use crate::core::settings;
use crate::error::{Error, Result};
use crate::types::{PixelFormat, ResizeMethod};

/// Keys cubic convolution parameter.
const CUBIC_A: f64 = -0.5;

/// Fixed-point precision of fast-mode weights.
const FIXED_SHIFT: u32 = 14;
const FIXED_ONE: i32 = 1 << FIXED_SHIFT;

/// Source taps contributing to one destination coordinate along one axis.
type Taps<W> = Vec<(usize, W)>;

/// Separable filters evaluated in-crate; Lanczos3 is delegated to `fast_image_resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Nearest,
    Bilinear,
    Area,
    Cubic,
}

/// Maps a destination coordinate to the (clamped) source sample coordinate.
fn source_coord(dst: usize, scale: f64, src_size: usize) -> f64 {
    ((dst as f64 + 0.5) * scale - 0.5).clamp(0.0, (src_size - 1) as f64)
}

fn cubic(d: f64) -> f64 {
    let d = d.abs();
    if d <= 1.0 {
        (CUBIC_A + 2.0) * d * d * d - (CUBIC_A + 3.0) * d * d + 1.0
    } else if d < 2.0 {
        CUBIC_A * d * d * d - 5.0 * CUBIC_A * d * d + 8.0 * CUBIC_A * d - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Per-destination tap lists for `filter` along one axis.
fn axis_weights(filter: Filter, src_size: usize, dst_size: usize) -> Vec<Taps<f32>> {
    let scale = src_size as f64 / dst_size as f64;
    let last = src_size - 1;

    (0..dst_size)
        .map(|d| {
            let taps: Vec<(usize, f64)> = match filter {
                Filter::Nearest => {
                    let s = source_coord(d, scale, src_size);
                    vec![(s.round() as usize, 1.0)]
                }
                Filter::Bilinear => {
                    let s = source_coord(d, scale, src_size);
                    let x0 = s.floor() as usize;
                    let fx = s - x0 as f64;
                    vec![(x0, 1.0 - fx), ((x0 + 1).min(last), fx)]
                }
                Filter::Cubic => {
                    let s = source_coord(d, scale, src_size);
                    let x0 = s.floor() as isize;
                    let t = s - x0 as f64;
                    (-1isize..=2)
                        .map(|k| {
                            let idx = (x0 + k).clamp(0, last as isize) as usize;
                            (idx, cubic(k as f64 - t))
                        })
                        .collect()
                }
                Filter::Area => {
                    let start = d as f64 * scale;
                    let end = ((d + 1) as f64 * scale).min(src_size as f64);
                    let first = start.floor() as usize;
                    let past = (end.ceil() as usize).clamp(first + 1, src_size);
                    (first..past)
                        .map(|i| {
                            let overlap = end.min((i + 1) as f64) - start.max(i as f64);
                            (i, overlap.max(0.0))
                        })
                        .collect()
                }
            };

            let total: f64 = taps.iter().map(|&(_, w)| w).sum();
            let norm = if total.abs() > f64::EPSILON { total } else { 1.0 };
            taps.into_iter()
                .map(|(i, w)| (i, (w / norm) as f32))
                .collect()
        })
        .collect()
}

/// Quantizes weights to Q14, keeping each tap list summing to exactly one.
fn to_fixed(weights: &[Taps<f32>]) -> Vec<Taps<i32>> {
    weights
        .iter()
        .map(|taps| {
            let mut fixed: Taps<i32> = taps
                .iter()
                .map(|&(i, w)| (i, (w * FIXED_ONE as f32).round() as i32))
                .collect();
            let sum: i32 = fixed.iter().map(|&(_, w)| w).sum();
            if let Some(max) = fixed.iter_mut().max_by_key(|tap| tap.1) {
                max.1 += FIXED_ONE - sum;
            }
            fixed
        })
        .collect()
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn convolve_f32(src: &PixelBuffer, dst: &mut PixelBuffer, xw: &[Taps<f32>], yw: &[Taps<f32>]) {
    let bpp = src.bytes_per_pixel();
    let tmp_row = dst.width() as usize * bpp;
    let mut tmp = vec![0f32; tmp_row * src.height() as usize];

    tmp.par_chunks_mut(tmp_row)
        .enumerate()
        .for_each(|(y, out)| {
            let row = src.row(y as u32);
            for (x, taps) in xw.iter().enumerate() {
                for c in 0..bpp {
                    out[x * bpp + c] = taps.iter().map(|&(i, w)| w * row[i * bpp + c] as f32).sum();
                }
            }
        });

    let stride = dst.stride() as usize;
    dst.data_mut()
        .par_chunks_mut(stride)
        .zip(yw.par_iter())
        .for_each(|(out, taps)| {
            let mut acc = vec![0f32; tmp_row];
            for &(sy, w) in taps {
                let row = &tmp[sy * tmp_row..(sy + 1) * tmp_row];
                for (a, &v) in acc.iter_mut().zip(row) {
                    *a += w * v;
                }
            }
            for (o, &a) in out[..tmp_row].iter_mut().zip(&acc) {
                *o = to_u8(a);
            }
        });
}

fn convolve_fixed(src: &PixelBuffer, dst: &mut PixelBuffer, xw: &[Taps<i32>], yw: &[Taps<i32>]) {
    let bpp = src.bytes_per_pixel();
    let tmp_row = dst.width() as usize * bpp;
    let mut tmp = vec![0i32; tmp_row * src.height() as usize];

    tmp.par_chunks_mut(tmp_row)
        .enumerate()
        .for_each(|(y, out)| {
            let row = src.row(y as u32);
            for (x, taps) in xw.iter().enumerate() {
                for c in 0..bpp {
                    out[x * bpp + c] = taps.iter().map(|&(i, w)| w * row[i * bpp + c] as i32).sum();
                }
            }
        });

    let stride = dst.stride() as usize;
    let round = 1i64 << (2 * FIXED_SHIFT - 1);
    dst.data_mut()
        .par_chunks_mut(stride)
        .zip(yw.par_iter())
        .for_each(|(out, taps)| {
            let mut acc = vec![0i64; tmp_row];
            for &(sy, w) in taps {
                let row = &tmp[sy * tmp_row..(sy + 1) * tmp_row];
                for (a, &v) in acc.iter_mut().zip(row) {
                    *a += w as i64 * v as i64;
                }
            }
            for (o, &a) in out[..tmp_row].iter_mut().zip(&acc) {
                *o = ((a + round) >> (2 * FIXED_SHIFT)).clamp(0, 255) as u8;
            }
        });
}

fn lanczos_pixel_type(format: PixelFormat) -> Result<PixelType> {
    match format {
        PixelFormat::Gray8 => Ok(PixelType::U8),
        PixelFormat::Uv16 => Ok(PixelType::U8x2),
        PixelFormat::Bgr24 | PixelFormat::Rgb24 => Ok(PixelType::U8x3),
        PixelFormat::Bgra32 | PixelFormat::Rgba32 => Ok(PixelType::U8x4),
        PixelFormat::Float32 => Err(Error::unsupported(format, "resize")),
    }
}

fn resize_lanczos(src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<()> {
    let pixel_type = lanczos_pixel_type(src.format())?;
    // Channels are resampled independently, alpha included.
    let resize_options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
        .use_alpha(false);
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        src.width(),
        src.height(),
        src.packed_data().into_owned(),
        pixel_type,
    )
    .map_err(Error::external)?;
    let mut dst_image = Image::new(dst.width(), dst.height(), pixel_type);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::external)?;

    let packed = dst_image.into_vec();
    let row_len = dst.width() as usize * dst.bytes_per_pixel();
    for (y, chunk) in packed.chunks_exact(row_len).enumerate() {
        dst.row_mut(y as u32).copy_from_slice(chunk);
    }
    Ok(())
}

/// Resizes `src` to `dst_width x dst_height`; the result is tightly packed.
pub fn resize(
    src: &PixelBuffer,
    dst_width: u32,
    dst_height: u32,
    method: ResizeMethod,
) -> Result<PixelBuffer> {
    resize_with_alignment(src, dst_width, dst_height, method, 1)
}

/// Like [`resize`], with the output stride rounded up to a multiple of `alignment` bytes.
pub fn resize_with_alignment(
    src: &PixelBuffer,
    dst_width: u32,
    dst_height: u32,
    method: ResizeMethod,
    alignment: usize,
) -> Result<PixelBuffer> {
    resize_with_mode(
        src,
        dst_width,
        dst_height,
        method,
        alignment,
        settings::fast_mode(),
    )
}

pub(crate) fn resize_with_mode(
    src: &PixelBuffer,
    dst_width: u32,
    dst_height: u32,
    method: ResizeMethod,
    alignment: usize,
    fast: bool,
) -> Result<PixelBuffer> {
    if dst_width == 0 || dst_height == 0 {
        return Err(Error::InvalidDimension {
            width: dst_width,
            height: dst_height,
        });
    }
    if src.is_empty() {
        return Err(Error::InvalidDimension {
            width: src.width(),
            height: src.height(),
        });
    }
    if !src.format().has_byte_channels() {
        return Err(Error::unsupported(src.format(), "resize"));
    }

    debug!(
        "Resizing {} {}x{} -> {}x{} ({}, fast={})",
        src.format(),
        src.width(),
        src.height(),
        dst_width,
        dst_height,
        method,
        fast
    );

    let mut dst = PixelBuffer::with_alignment(src.format(), dst_width, dst_height, alignment)?;

    let filter = match method {
        ResizeMethod::Nearest => Filter::Nearest,
        ResizeMethod::Bilinear => Filter::Bilinear,
        ResizeMethod::Area => Filter::Area,
        ResizeMethod::Bicubic => Filter::Cubic,
        ResizeMethod::Lanczos3 => {
            settings::install(|| resize_lanczos(src, &mut dst))??;
            return Ok(dst);
        }
    };

    let xw = axis_weights(filter, src.width() as usize, dst_width as usize);
    let yw = axis_weights(filter, src.height() as usize, dst_height as usize);
    if fast {
        let (xf, yf) = (to_fixed(&xw), to_fixed(&yw));
        settings::install(|| convolve_fixed(src, &mut dst, &xf, &yf))?;
    } else {
        settings::install(|| convolve_f32(src, &mut dst, &xw, &yw))?;
    }
    Ok(dst)
}
