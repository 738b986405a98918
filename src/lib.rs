#![doc = r#"
tensorprep: image-to-tensor input preparation for neural-network front ends.

This crate turns encoded images into float tensors: decode (JPEG/PNG), resize
with a selectable interpolation method, map every 8-bit channel into a per-channel
float range, and pack the values channel-major (NCHW) or pixel-major (NHWC) into
a buffer the caller owns or the crate allocates.

Resize and pack run on a worker pool sized from a process-wide thread-count
setting; a second process-wide flag (fast mode) trades strict float arithmetic
for fixed-point/table kernels.

Quick start: prepare a tensor from a file
-----------------------------------------
```rust,no_run
use std::path::Path;
use tensorprep::{prepare_input_from_path, InputParams, ResizeMethod, TensorLayout};

fn main() -> tensorprep::Result<()> {
    let params = InputParams {
        width: 224,
        height: 224,
        method: ResizeMethod::Area,
        lower: vec![-1.0, -1.0, -1.0],
        upper: vec![1.0, 1.0, 1.0],
        layout: TensorLayout::ChannelMajor,
        format: None,
    };
    let tensor = prepare_input_from_path(Path::new("city.jpg"), &params)?;
    println!("shape {:?}", tensor.shape());
    Ok(())
}
```

Low-level building blocks
-------------------------
```rust
use tensorprep::{pack, resize, NormalizationRange, PixelBuffer, PixelFormat, ResizeMethod, TensorLayout};

fn main() -> tensorprep::Result<()> {
    let mut image = PixelBuffer::new(PixelFormat::Bgr24, 4, 4)?;
    image.fill(&[255, 0, 0])?;

    let small = resize(&image, 2, 2, ResizeMethod::Nearest)?;
    let range = NormalizationRange::unit(3);
    let mut input = vec![0.0f32; 2 * 2 * 3];
    pack(&small, &range, TensorLayout::ChannelMajor, &mut input)?;

    assert!(input[..4].iter().all(|v| (v - 1.0).abs() < 1e-6));
    assert!(input[4..].iter().all(|v| v.abs() < 1e-6));
    Ok(())
}
```

Runtime settings
----------------
```rust
use tensorprep::settings;

let saved = settings::RuntimeSettings::current();
settings::set_thread_number(-1); // all cores
settings::set_fast_mode(true);
assert!(settings::thread_number() >= 1);
saved.apply();
```

Error handling
--------------
All public functions return `tensorprep::Result<T>`; match on `tensorprep::Error`
for `InvalidDimension`, `UnsupportedFormat`, `ShapeMismatch`,
`ChannelCountMismatch` or a pass-through `Decode` failure. A failed `pack` may
leave the destination partially written; discard it.

Useful modules
--------------
- [`api`]: high-level entry points and `ndarray` output.
- [`core`]: pixel buffers, resize/normalize/pack kernels, pipeline, settings.
- [`io`]: decoding and JPEG/PNG writers.
- [`types`]: `PixelFormat`, `ResizeMethod`, `TensorLayout`, `Position`, `ImageFileFormat`.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::image::{PixelBuffer, Rect};
pub use core::params::InputParams;
pub use core::processing::normalize::NormalizationRange;
pub use core::processing::pack::{Tensor, tensor_index, tensor_len};
pub use error::{Error, Result};
pub use types::{ImageFileFormat, PixelFormat, Position, ResizeMethod, TensorLayout};

// Kernels
pub use core::checksum::crc32;
pub use core::processing::pack::pack;
pub use core::processing::pipeline::{
    prepare_buffer, prepare_buffer_into, prepare_input, prepare_input_into,
};
pub use core::processing::resize::{resize, resize_with_alignment};
pub use core::settings;

// Codecs
pub use io::{decode, encode, load, save};

// High-level API re-exports
pub use api::{prepare_input_array, prepare_input_from_path, system_info, tensor_to_array};
