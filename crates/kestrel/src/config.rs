//! Run configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it overrides.

use crate::error::ConfigError;
use kestrel_data::ScanQuery;
use kestrel_factors::{NormalizerConfig, ScoringConfig};
use kestrel_screen::ScreeningConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Allowed deviation of the composite weight sum from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Default cache directory: `<platform cache dir>/kestrel`.
///
/// - Linux: `~/.cache/kestrel/`
/// - macOS: `~/Library/Caches/kestrel/`
/// - Windows: `%LOCALAPPDATA%\kestrel\`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kestrel")
}

/// Scanner universe query settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scanner market (default: `china`)
    pub market: String,
    /// Minimum market cap in CNY (default: 1e9)
    pub min_market_cap: f64,
    /// Maximum rows requested (default: 3000)
    pub limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            market: "china".to_string(),
            min_market_cap: 1e9,
            limit: 3000,
        }
    }
}

impl ScanConfig {
    /// Broad fundamentals query for these settings.
    pub fn query(&self) -> ScanQuery {
        ScanQuery::broad_universe(self.market.clone(), self.min_market_cap, self.limit)
    }
}

/// Sentiment snapshot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Join sentiment into the final list (default: true)
    pub enabled: bool,
    /// Snapshot directory (default: [`default_cache_dir`])
    pub cache_dir: Option<PathBuf>,
    /// Snapshot file prefix (default: `stock_comment_em`)
    pub file_prefix: String,
    /// Rows per page when fetching (default: 500)
    pub page_size: usize,
    /// Pause between pages in milliseconds (default: 200)
    pub page_delay_ms: u64,
    /// Ignore cached snapshots and fetch anew (default: false)
    pub force_refresh: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: None,
            file_prefix: "stock_comment_em".to_string(),
            page_size: 500,
            page_delay_ms: 200,
            force_refresh: false,
        }
    }
}

impl SentimentConfig {
    /// Configured snapshot directory, or the platform default.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// Pause between page requests.
    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the final list (default: `stock_data`)
    pub dir: PathBuf,
    /// Final list file prefix (default: `cn_stock_screening`)
    pub file_prefix: String,
    /// Rows shown in the console table (default: 10)
    pub report_head: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("stock_data"),
            file_prefix: "cn_stock_screening".to_string(),
            report_head: 10,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KestrelConfig {
    /// Universe query
    pub scan: ScanConfig,
    /// Industry rank normalization
    pub normalizer: NormalizerConfig,
    /// Score weights
    pub scoring: ScoringConfig,
    /// Screening thresholds
    pub screening: ScreeningConfig,
    /// Sentiment snapshot handling
    pub sentiment: SentimentConfig,
    /// Output files and report
    pub output: OutputConfig,
    /// JSON map of sector labels to localized labels; identity when unset
    pub translations: Option<PathBuf>,
}

impl KestrelConfig {
    /// Load a JSON configuration file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalizer.metrics.is_empty() {
            return Err(ConfigError::Invalid {
                field: "normalizer.metrics",
                message: "at least one metric is required".to_string(),
            });
        }
        if self.scan.limit == 0 {
            return Err(ConfigError::Invalid {
                field: "scan.limit",
                message: "must be positive".to_string(),
            });
        }
        if self.sentiment.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "sentiment.page_size",
                message: "must be positive".to_string(),
            });
        }
        let weights = &self.scoring.composite;
        if weights.fcf_weight < 0.0 || weights.turnover_weight < 0.0 {
            return Err(ConfigError::Invalid {
                field: "scoring.composite",
                message: "weights must be non-negative".to_string(),
            });
        }
        let total = weights.fcf_weight + weights.turnover_weight;
        let balanced = (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE;
        if !balanced {
            return Err(ConfigError::Invalid {
                field: "scoring.composite",
                message: format!("weights must sum to 1, got {total}"),
            });
        }
        Ok(())
    }

    /// Pretty JSON form, as accepted by [`load`](Self::load).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_factors::{GroupKey, Metric};

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kestrel-{name}-{}.json", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = KestrelConfig::default();
        assert_eq!(config.scan.market, "china");
        assert_eq!(config.scan.limit, 3000);
        assert_eq!(config.normalizer.min_group_size, 5);
        assert_eq!(config.normalizer.group_key, GroupKey::Sector);
        assert_eq!(config.screening.min_focus_score, 70.0);
        assert_eq!(config.output.file_prefix, "cn_stock_screening");
        assert_eq!(config.sentiment.file_prefix, "stock_comment_em");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_file(
            "partial",
            r#"{
                "normalizer": {"group_key": "industry"},
                "screening": {"min_market_cap": 1e10},
                "output": {"report_head": 25}
            }"#,
        );
        let config = KestrelConfig::load(&path).unwrap();
        assert_eq!(config.normalizer.group_key, GroupKey::Industry);
        assert_eq!(config.normalizer.metrics, Metric::ALL.to_vec());
        assert_eq!(config.screening.min_market_cap, 1e10);
        assert_eq!(config.screening.min_validation_score, 60.0);
        assert_eq!(config.output.report_head, 25);
        assert_eq!(config.output.dir, PathBuf::from("stock_data"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_round_trip() {
        let config = KestrelConfig::default();
        let json = config.to_json_pretty().unwrap();
        let path = temp_file("round-trip", &json);
        assert_eq!(KestrelConfig::load(&path).unwrap(), config);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_values() {
        let path = temp_file("invalid", r#"{"normalizer": {"metrics": []}}"#);
        assert!(matches!(
            KestrelConfig::load(&path),
            Err(ConfigError::Invalid { field: "normalizer.metrics", .. })
        ));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_composite_weights_must_sum_to_one() {
        for (fcf, turnover) in [(1.0, 1.0), (0.5, 0.4), (f64::NAN, 0.4), (-0.2, 1.2)] {
            let mut config = KestrelConfig::default();
            config.scoring.composite.fcf_weight = fcf;
            config.scoring.composite.turnover_weight = turnover;
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid { field: "scoring.composite", .. })
                ),
                "{fcf} + {turnover}"
            );
        }

        let mut config = KestrelConfig::default();
        config.scoring.composite.fcf_weight = 0.7;
        config.scoring.composite.turnover_weight = 0.3;
        assert!(config.validate().is_ok());

        let path = temp_file(
            "weights",
            r#"{"scoring": {"composite": {"fcf_weight": 1.0, "turnover_weight": 1.0}}}"#,
        );
        assert!(KestrelConfig::load(&path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let missing = std::env::temp_dir().join("kestrel-does-not-exist.json");
        assert!(matches!(
            KestrelConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
        assert!(KestrelConfig::load_or_default(None).is_ok());
    }

    #[test]
    fn test_query_from_scan_config() {
        let query = ScanConfig::default().query();
        assert_eq!(query.market, "china");
        assert_eq!(query.limit, 3000);
        assert_eq!(query.predicates.len(), 4);
    }

    #[test]
    fn test_resolved_cache_dir() {
        let config = SentimentConfig {
            cache_dir: Some(PathBuf::from("/tmp/kestrel")),
            ..SentimentConfig::default()
        };
        assert_eq!(config.resolved_cache_dir(), PathBuf::from("/tmp/kestrel"));
        assert!(SentimentConfig::default().resolved_cache_dir().ends_with("kestrel"));
    }
}
