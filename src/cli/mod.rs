//! Smoke-check layer for tensorprep.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the check sequence (`runner`): host info, runtime settings get/set,
//! image load/crop/resize/fill/save, and tensor-input preparation.
//!
//! If you are embedding tensorprep into another application, use the
//! library API (`tensorprep::api`) instead of this code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
