//! Core building blocks: pixel buffers, resize/normalize/pack kernels, the
//! input-preparation pipeline, CRC-32 and the process-wide runtime settings.
//! These are consumed by the high-level `api` module.
pub mod checksum;
pub mod image;
pub mod params;
pub mod processing;
pub mod settings;
