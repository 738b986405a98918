use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the smoke runner
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input image not found: {path:?}")]
    MissingInput { path: PathBuf },

    #[error("Output directory is not a directory: {path:?}")]
    BadOutputDir { path: PathBuf },

    #[error("Settings were not restored: expected {expected}, got {actual}")]
    SettingsNotRestored { expected: String, actual: String },

    #[error(transparent)]
    Library(#[from] tensorprep::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
