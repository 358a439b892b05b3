//! Export of the final list.
//!
//! Writes rows as CSV, JSON, pretty JSON or Parquet. A screening run persists
//! a Parquet snapshot and a pretty JSON copy side by side, both named after
//! the run timestamp.

use crate::row::ScreeningRow;
use kestrel_data::DataError;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Columnar conversion or Parquet error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Column decoding error.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,

    /// Parquet columnar format. Binary; file export only.
    Parquet,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
            Self::Parquet => "parquet",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the format is binary.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Vec<ScreeningRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in self {
                    wtr.serialize(row)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Parquet => Err(ExportError::InvalidFormat(
                "parquet is a binary format".to_string(),
            )),
        }
    }

    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        if format == ExportFormat::Parquet {
            let mut df = ScreeningRow::to_dataframe(self)?;
            let file = File::create(path)?;
            ParquetWriter::new(file).finish(&mut df)?;
            return Ok(());
        }
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Read rows back from a Parquet file written by [`Exporter::export_to_file`].
pub fn read_parquet(path: &Path) -> Result<Vec<ScreeningRow>, ExportError> {
    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    ScreeningRow::from_dataframe(&df)
}

/// Files written by one screening run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Parquet snapshot
    pub parquet: PathBuf,
    /// Pretty JSON copy
    pub json: PathBuf,
}

/// Persist `rows` as `{dir}/{prefix}_{timestamp}.parquet` and `.json`.
///
/// Creates `dir` if needed.
pub fn write_outputs(
    rows: &[ScreeningRow],
    dir: &Path,
    prefix: &str,
    timestamp: &str,
) -> Result<OutputPaths, ExportError> {
    if timestamp.is_empty() || timestamp.contains(['/', '\\']) {
        return Err(ExportError::InvalidFormat(format!(
            "invalid run timestamp {timestamp:?}"
        )));
    }
    fs::create_dir_all(dir)?;

    let stem = format!("{prefix}_{timestamp}");
    let paths = OutputPaths {
        parquet: dir.join(format!("{stem}.{}", ExportFormat::Parquet.extension())),
        json: dir.join(format!("{stem}.{}", ExportFormat::PrettyJson.extension())),
    };

    let rows = rows.to_vec();
    rows.export_to_file(&paths.parquet, ExportFormat::Parquet)?;
    rows.export_to_file(&paths.json, ExportFormat::PrettyJson)?;

    info!(
        rows = rows.len(),
        parquet = %paths.parquet.display(),
        json = %paths.json.display(),
        "final list saved"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::tests::weighted;
    use kestrel_data::SectorTranslations;

    fn rows() -> Vec<ScreeningRow> {
        ScreeningRow::from_weighted_list(
            &[
                weighted("600519", "Consumer Non-Durables", true),
                weighted("000858", "Consumer Non-Durables", false),
            ],
            &SectorTranslations::identity(),
        )
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
        assert_eq!(ExportFormat::Parquet.extension(), "parquet");
    }

    #[test]
    fn test_export_csv() {
        let csv = rows().export_to_string(ExportFormat::Csv).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("code,name,description,sector"));
        assert!(header.ends_with("weight"));
        assert!(csv.contains("600519"));
        assert!(csv.contains("贵州茅台"));
    }

    #[test]
    fn test_export_pretty_json_keeps_non_ascii() {
        let json = rows().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\"贵州茅台\""));
        assert!(json.contains("利润率领先 | 资产周转优秀"));
        assert!(json.contains("  "));
        assert!(json.contains("\"net_income_growth\": 0.25"));
        assert!(json.contains("\"debt_to_equity\": 0.4"));
        assert!(json.contains("\"market_cap\": 1830000000000.0"));
        assert!(json.contains("\"trade_date\": \"2024-06-28\""));

        let decoded: Vec<ScreeningRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, rows());
    }

    #[test]
    fn test_parquet_string_is_rejected() {
        assert!(matches!(
            rows().export_to_string(ExportFormat::Parquet),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_write_outputs_rejects_bad_timestamp() {
        let dir = std::env::temp_dir();
        assert!(write_outputs(&rows(), &dir, "cn_stock_screening", "").is_err());
        assert!(write_outputs(&rows(), &dir, "cn_stock_screening", "a/b").is_err());
    }
}
