//! decode -> resize -> normalize/pack.
//!
//! Stages run sequentially; each stage's input buffer is dropped as soon as its
//! output exists, so at most the decoded image, the resized image and the tensor
//! are alive at once. The first failure is returned unchanged.
use tracing::{debug, info};

use crate::core::image::PixelBuffer;
use crate::core::params::InputParams;
use crate::core::processing::normalize::NormalizationRange;
use crate::core::processing::pack::{Tensor, pack};
use crate::core::processing::resize::resize;
use crate::error::Result;
use crate::io::decode::decode;

fn resize_stage(src: PixelBuffer, params: &InputParams) -> Result<PixelBuffer> {
    if src.width() == params.width && src.height() == params.height && !src.is_empty() {
        debug!("Source already {}x{}, skipping resize", params.width, params.height);
        return Ok(src);
    }
    info!(
        "Resizing {}x{} -> {}x{} ({})",
        src.width(),
        src.height(),
        params.width,
        params.height,
        params.method
    );
    let resized = resize(&src, params.width, params.height, params.method)?;
    drop(src);
    Ok(resized)
}

fn checked_range(src: &PixelBuffer, params: &InputParams) -> Result<NormalizationRange> {
    let range = params.range()?;
    range.check_channels(src.channel_count())?;
    Ok(range)
}

/// Resizes an already decoded buffer and packs it into a new tensor.
pub fn prepare_buffer(src: PixelBuffer, params: &InputParams) -> Result<Tensor> {
    let range = checked_range(&src, params)?;
    let resized = resize_stage(src, params)?;
    let mut tensor = Tensor::zeros(
        resized.width(),
        resized.height(),
        resized.channel_count(),
        params.layout,
    );
    pack(&resized, &range, params.layout, &mut tensor.data)?;
    Ok(tensor)
}

/// Resizes an already decoded buffer and packs it into the caller's `dst`.
pub fn prepare_buffer_into(src: PixelBuffer, params: &InputParams, dst: &mut [f32]) -> Result<()> {
    let range = checked_range(&src, params)?;
    let resized = resize_stage(src, params)?;
    pack(&resized, &range, params.layout, dst)
}

/// Decodes `bytes` and prepares a newly allocated tensor.
pub fn prepare_input(bytes: &[u8], params: &InputParams) -> Result<Tensor> {
    let decoded = decode(bytes, params.format)?;
    info!(
        "Decoded {} {}x{} (crc32 {:08X})",
        decoded.format(),
        decoded.width(),
        decoded.height(),
        decoded.crc32()
    );
    prepare_buffer(decoded, params)
}

/// Decodes `bytes` and packs into the caller's `dst`, which must hold
/// `width * height * channels` floats for the decoded format.
pub fn prepare_input_into(bytes: &[u8], params: &InputParams, dst: &mut [f32]) -> Result<()> {
    let decoded = decode(bytes, params.format)?;
    prepare_buffer_into(decoded, params, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{PixelFormat, ResizeMethod, TensorLayout};

    fn assert_close(got: &[f32], want: &[f32]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-6, "{:?} != {:?}", got, want);
        }
    }

    fn solid(width: u32, height: u32, pixel: &[u8]) -> PixelBuffer {
        let mut img = PixelBuffer::new(PixelFormat::Bgr24, width, height).unwrap();
        img.fill(pixel).unwrap();
        img
    }

    #[test]
    fn solid_blue_scenario() {
        let params = InputParams {
            width: 2,
            height: 2,
            method: ResizeMethod::Nearest,
            layout: TensorLayout::ChannelMajor,
            ..InputParams::default()
        };
        let tensor = prepare_buffer(solid(4, 4, &[255, 0, 0]), &params).unwrap();
        assert_eq!(tensor.shape(), [1, 3, 2, 2]);
        assert_close(&tensor.data[0..4], &[1.0; 4]);
        assert_close(&tensor.data[4..12], &[0.0; 8]);
    }

    #[test]
    fn zero_target_fails() {
        let params = InputParams {
            width: 0,
            ..InputParams::default()
        };
        assert!(matches!(
            prepare_buffer(solid(4, 4, &[1, 2, 3]), &params),
            Err(Error::InvalidDimension { width: 0, .. })
        ));
    }

    #[test]
    fn arity_checked_before_resize() {
        let params = InputParams {
            lower: vec![0.0; 4],
            upper: vec![1.0; 4],
            ..InputParams::default()
        };
        assert!(matches!(
            prepare_buffer(solid(4, 4, &[1, 2, 3]), &params),
            Err(Error::ChannelCountMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn borrowed_destination() {
        let params = InputParams {
            width: 3,
            height: 3,
            ..InputParams::default()
        };
        let mut dst = vec![0f32; 27];
        prepare_buffer_into(solid(6, 6, &[0, 255, 0]), &params, &mut dst).unwrap();
        for px in dst.chunks_exact(3) {
            assert_close(px, &[0.0, 1.0, 0.0]);
        }

        let mut short = vec![0f32; 26];
        assert!(matches!(
            prepare_buffer_into(solid(6, 6, &[0, 255, 0]), &params, &mut short),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
