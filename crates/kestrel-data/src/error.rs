//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Remote API returned an error payload
    #[error("{provider} API error: {message}")]
    Api {
        /// Provider that produced the error
        provider: &'static str,
        /// Error message reported by the provider
        message: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Required column absent from a table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
