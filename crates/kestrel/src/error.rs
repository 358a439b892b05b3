//! Error types for configuration and pipeline runs.

use kestrel_data::DataError;
use kestrel_output::ExportError;
use kestrel_screen::ScreenError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for this schema
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A value is out of its allowed range
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data acquisition or cache error
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Fatal screening precondition
    #[error("screening error: {0}")]
    Screen(#[from] ScreenError),

    /// Persistence error
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
