//! Caching layer for fetched datasets.

pub mod snapshot;

pub use snapshot::{SnapshotCache, TIMESTAMP_FORMAT, is_timestamp, timestamp_now};
