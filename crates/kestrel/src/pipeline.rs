//! End-to-end screening run.
//!
//! Acquire a universe, rank and score it, screen, join sentiment, weight and
//! persist. Each stage consumes the previous stage's output; nothing is
//! shared or updated in place.

use crate::config::KestrelConfig;
use crate::error::Result;
use kestrel_data::sentiment::latest_snapshot;
use kestrel_data::{
    RawRecord, ScanProvider, SectorTranslations, SentimentProvider, SentimentRecord, SnapshotCache,
};
use kestrel_factors::{ScoredRecord, normalize, score_all};
use kestrel_output::{OutputPaths, ScreeningReport, ScreeningRow, write_outputs};
use kestrel_screen::{assign_weights, join_sentiment, screen};
use std::fmt;
use tracing::{info, warn};

/// A completed run with a non-empty final list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningRun {
    /// Rows returned by the scanner
    pub universe: usize,
    /// Final list, highest weight first
    pub rows: Vec<ScreeningRow>,
    /// Files written
    pub outputs: OutputPaths,
}

impl ScreeningRun {
    /// Console report showing the first `head` rows.
    pub fn report(&self, head: usize) -> ScreeningReport<'_> {
        ScreeningReport::new(&self.rows, head)
    }
}

/// How a run ended. Only `Completed` writes files.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreeningOutcome {
    /// The scanner returned no rows
    EmptyUniverse,
    /// No record cleared the screening thresholds
    NoCandidates {
        /// Rows returned by the scanner
        universe: usize,
    },
    /// A final list was produced and saved
    Completed(ScreeningRun),
}

impl fmt::Display for ScreeningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUniverse => write!(f, "Scanner returned no stocks; nothing to screen"),
            Self::NoCandidates { universe } => {
                write!(f, "No stocks out of {universe} met the screening criteria")
            }
            Self::Completed(run) => write!(
                f,
                "Selected {} of {} stocks; saved {} and {}",
                run.rows.len(),
                run.universe,
                run.outputs.parquet.display(),
                run.outputs.json.display()
            ),
        }
    }
}

/// Screening pipeline over a scanner and a sentiment source.
#[derive(Debug)]
pub struct Pipeline<S, C> {
    config: KestrelConfig,
    scanner: S,
    sentiment: C,
    translations: SectorTranslations,
}

impl<S, C> Pipeline<S, C>
where
    S: ScanProvider,
    C: SentimentProvider,
{
    /// Create a pipeline, loading the configured translation table.
    pub fn new(config: KestrelConfig, scanner: S, sentiment: C) -> Result<Self> {
        config.validate()?;
        let translations = match &config.translations {
            Some(path) => SectorTranslations::load(path)?,
            None => SectorTranslations::identity(),
        };
        Ok(Self {
            config,
            scanner,
            sentiment,
            translations,
        })
    }

    /// Replace the translation table.
    pub fn with_translations(mut self, translations: SectorTranslations) -> Self {
        self.translations = translations;
        self
    }

    /// Effective configuration.
    pub const fn config(&self) -> &KestrelConfig {
        &self.config
    }

    /// Sentiment snapshot cache for the configured directory and prefix.
    pub fn sentiment_cache(&self) -> SnapshotCache {
        SnapshotCache::new(
            self.config.sentiment.resolved_cache_dir(),
            self.config.sentiment.file_prefix.clone(),
        )
    }

    /// Query the scanner and decode the rows.
    pub async fn fetch_universe(&self) -> Result<Vec<RawRecord>> {
        let query = self.config.scan.query();
        let result = self.scanner.scan(&query).await?;
        info!(
            total_count = result.total_count,
            rows = result.table.height(),
            "universe fetched"
        );
        if result.is_empty() {
            return Ok(Vec::new());
        }
        Ok(RawRecord::from_frame(&result.table)?)
    }

    /// Attach industry ranks and scores.
    pub fn score(&self, records: Vec<RawRecord>) -> Vec<ScoredRecord> {
        let normalized = normalize(records, &self.config.normalizer);
        score_all(normalized, &self.config.scoring)
    }

    /// Latest sentiment snapshot, fetching one when needed. Empty when
    /// sentiment is disabled.
    pub async fn load_sentiment(&self, timestamp: &str) -> Result<Vec<SentimentRecord>> {
        if !self.config.sentiment.enabled {
            return Ok(Vec::new());
        }
        let cache = self.sentiment_cache();
        Ok(latest_snapshot(
            &cache,
            &self.sentiment,
            self.config.sentiment.force_refresh,
            timestamp,
        )
        .await?)
    }

    /// Run every stage. `timestamp` names the output files and any new
    /// sentiment snapshot.
    pub async fn run(&self, timestamp: &str) -> Result<ScreeningOutcome> {
        let records = self.fetch_universe().await?;
        let universe = records.len();
        if universe == 0 {
            warn!("scanner returned no rows");
            return Ok(ScreeningOutcome::EmptyUniverse);
        }

        let scored = self.score(records);
        let shortlist = screen(scored, &self.config.screening);
        if shortlist.is_empty() {
            warn!(universe, "no candidates met the screening criteria");
            return Ok(ScreeningOutcome::NoCandidates { universe });
        }

        let sentiment = self.load_sentiment(timestamp).await?;
        let weighted = assign_weights(join_sentiment(shortlist, &sentiment))?;
        let rows = ScreeningRow::from_weighted_list(&weighted, &self.translations);

        let output = &self.config.output;
        let outputs = write_outputs(&rows, &output.dir, &output.file_prefix, timestamp)?;
        info!(universe, selected = rows.len(), "screening run complete");

        Ok(ScreeningOutcome::Completed(ScreeningRun {
            universe,
            rows,
            outputs,
        }))
    }
}
