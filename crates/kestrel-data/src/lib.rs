#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod fundamentals;
pub mod scanner;
pub mod sentiment;
pub mod translations;

pub use cache::SnapshotCache;
pub use error::{DataError, Result};
pub use fundamentals::{RawRecord, TechnicalRatings};
pub use scanner::{ScanProvider, ScanQuery, ScanResult, TradingViewScanner};
pub use sentiment::{EastmoneyCommentProvider, SentimentProvider, SentimentRecord};
pub use translations::SectorTranslations;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
