//! High-level, ergonomic library API: prepare tensors from files or bytes,
//! get them back as `ndarray` arrays, and query the host/runtime summary.
//! Prefer these entrypoints over the low-level processing modules.
use std::path::Path;

use ndarray::Array4;
use sysinfo::System;
use tracing::info;

use crate::core::params::InputParams;
use crate::core::processing::pack::Tensor;
use crate::core::processing::pipeline::{prepare_buffer, prepare_input};
use crate::core::settings;
use crate::error::{Error, Result};
use crate::io::decode::load;

/// Loads an image file and prepares a tensor from it.
pub fn prepare_input_from_path(path: &Path, params: &InputParams) -> Result<Tensor> {
    info!("Preparing tensor input from {:?}", path);
    let decoded = load(path, params.format)?;
    prepare_buffer(decoded, params)
}

/// Views a packed tensor as a 4-D array (`[1, C, H, W]` or `[1, H, W, C]`).
pub fn tensor_to_array(tensor: Tensor) -> Result<Array4<f32>> {
    let shape = tensor.shape();
    Array4::from_shape_vec(shape, tensor.data).map_err(Error::external)
}

/// Decodes `bytes` and returns the prepared input as an `ndarray` tensor.
pub fn prepare_input_array(bytes: &[u8], params: &InputParams) -> Result<Array4<f32>> {
    tensor_to_array(prepare_input(bytes, params)?)
}

/// Host and runtime summary: OS, CPU, memory, worker threads and fast mode.
pub fn system_info() -> String {
    let sys = System::new_all();
    let brand = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "unknown CPU".to_string());
    format!(
        "{} {}; {}, {} logical cores; {:.1} GB RAM; threads: {}, fast mode: {}",
        System::name().unwrap_or_else(|| "unknown OS".to_string()),
        System::os_version().unwrap_or_default(),
        brand,
        sys.cpus().len(),
        sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
        settings::thread_number(),
        settings::fast_mode()
    )
}
