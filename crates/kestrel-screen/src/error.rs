//! Error types for screening and weighting.

use thiserror::Error;

/// Errors that abort a screening run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// A shortlisted record has no market capitalization
    #[error("missing market cap for {symbol}")]
    MissingMarketCap {
        /// Instrument identifier
        symbol: String,
    },

    /// Size was zero, negative or not finite
    #[error("non-positive size for {symbol}: {size}")]
    NonPositiveSize {
        /// Instrument identifier
        symbol: String,
        /// Offending size
        size: f64,
    },

    /// `score * ln(size)` came out negative
    #[error("negative raw weight for {symbol}: {weight}")]
    NegativeWeight {
        /// Instrument identifier
        symbol: String,
        /// Offending raw weight
        weight: f64,
    },

    /// Raw weights summed to zero, so they cannot be normalized
    #[error("raw weights sum to zero across {count} records")]
    ZeroTotalWeight {
        /// Number of records weighted
        count: usize,
    },
}

/// Result type for screening operations
pub type Result<T> = std::result::Result<T, ScreenError>;
