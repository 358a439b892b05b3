//! End-to-end runs against in-memory providers.

use approx::assert_relative_eq;
use kestrel::data::fundamentals::columns;
use kestrel::data::{
    Result as DataResult, ScanProvider, ScanQuery, ScanResult, SectorTranslations,
    SentimentProvider, SentimentRecord,
};
use kestrel::{KestrelConfig, Pipeline, ScreeningOutcome};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct StaticScanner {
    table: DataFrame,
}

impl ScanProvider for StaticScanner {
    async fn scan(&self, query: &ScanQuery) -> DataResult<ScanResult> {
        assert_eq!(query.market, "china");
        Ok(ScanResult {
            total_count: self.table.height(),
            table: self.table.clone(),
        })
    }
}

#[derive(Clone, Default)]
struct CountingSentiment {
    calls: Arc<AtomicUsize>,
}

impl SentimentProvider for CountingSentiment {
    async fn fetch_all(&self) -> DataResult<Vec<SentimentRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            SentimentRecord {
                name: Some("十二号".to_string()),
                current_rank: Some(40.0),
                ..SentimentRecord::new("S12")
            },
            SentimentRecord {
                name: Some("十号".to_string()),
                current_rank: Some(7.0),
                ..SentimentRecord::new("S10")
            },
        ])
    }
}

/// Twelve stocks in one sector whose fundamentals improve with the index,
/// plus one unclassified stock.
fn universe() -> DataFrame {
    let idx: Vec<f64> = (1..=12).map(f64::from).collect();
    let scale = |k: f64| idx.iter().map(|i| Some(i * k)).collect::<Vec<_>>();

    let mut names: Vec<String> = (1..=12).map(|i| format!("S{i}")).collect();
    names.push("UNCLASSIFIED".to_string());
    let mut sectors: Vec<Option<&str>> = vec![Some("Consumer Non-Durables"); 12];
    sectors.push(None);
    let pad = |mut v: Vec<Option<f64>>| {
        v.push(Some(1.0));
        v
    };

    DataFrame::new(vec![
        Column::new(columns::NAME.into(), names),
        Column::new(columns::SECTOR.into(), sectors),
        Column::new(columns::MARKET_CAP.into(), vec![1e10; 13]),
        Column::new(columns::FCF_MARGIN.into(), pad(scale(0.02))),
        Column::new(columns::ASSET_TURNOVER.into(), pad(scale(0.1))),
        Column::new(columns::OPERATING_MARGIN.into(), pad(scale(0.02))),
        Column::new(columns::ROE.into(), pad(scale(0.02))),
        Column::new(columns::REVENUE_GROWTH.into(), pad(scale(0.01))),
        Column::new(columns::NET_INCOME_GROWTH.into(), pad(scale(0.01))),
        Column::new(
            columns::DEBT_TO_EQUITY.into(),
            pad(idx.iter().map(|i| Some((13.0 - i) * 0.1)).collect()),
        ),
        Column::new(
            columns::PRICE_EARNINGS.into(),
            pad(idx.iter().map(|i| Some(40.0 - i)).collect()),
        ),
        Column::new(
            columns::PEG.into(),
            pad(idx.iter().map(|i| Some(3.0 - 0.2 * i)).collect()),
        ),
    ])
    .unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kestrel-pipeline-{name}-{}", std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    dir
}

fn config(name: &str) -> KestrelConfig {
    let root = temp_dir(name);
    let mut config = KestrelConfig::default();
    config.output.dir = root.join("out");
    config.sentiment.cache_dir = Some(root.join("cache"));
    config
}

fn pipeline(
    config: KestrelConfig,
    table: DataFrame,
    sentiment: CountingSentiment,
) -> Pipeline<StaticScanner, CountingSentiment> {
    Pipeline::new(config, StaticScanner { table }, sentiment).unwrap()
}

#[tokio::test]
async fn completed_run_writes_weighted_list() {
    let sentiment = CountingSentiment::default();
    let translations = SectorTranslations::from_map(HashMap::from([(
        "Consumer Non-Durables".to_string(),
        "非耐用消费品".to_string(),
    )]));
    let pipeline = pipeline(config("completed"), universe(), sentiment.clone())
        .with_translations(translations);

    let run = match pipeline.run("20240628_153000").await.unwrap() {
        ScreeningOutcome::Completed(run) => run,
        other => panic!("expected a completed run, got {other:?}"),
    };

    assert_eq!(run.universe, 13);
    let codes: Vec<_> = run.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["S12", "S11", "S10", "S9"]);

    let total: f64 = run.rows.iter().map(|r| r.weight).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    assert_relative_eq!(run.rows[0].focus_score, 100.0, epsilon = 1e-9);
    assert_relative_eq!(run.rows[0].market_cap_yi, 100.0);

    assert_eq!(run.rows[0].name.as_deref(), Some("十二号"));
    assert_eq!(run.rows[1].name, None);
    assert_eq!(run.rows[2].current_rank, Some(7.0));
    assert_eq!(run.rows[0].sector.as_deref(), Some("非耐用消费品"));

    assert!(run.outputs.parquet.exists());
    assert!(run.outputs.json.exists());
    assert_eq!(sentiment.calls.load(Ordering::SeqCst), 1);
    assert_eq!(pipeline.sentiment_cache().list().unwrap().len(), 1);

    let saved = kestrel::output::read_parquet(&run.outputs.parquet).unwrap();
    assert_eq!(saved, run.rows);
    assert!(run.report(2).to_string().contains("Candidates:         4"));
}

#[tokio::test]
async fn cached_sentiment_is_reused() {
    let sentiment = CountingSentiment::default();
    let pipeline = pipeline(config("cached"), universe(), sentiment.clone());

    pipeline.run("20240628_153000").await.unwrap();
    pipeline.run("20240628_160000").await.unwrap();

    assert_eq!(sentiment.calls.load(Ordering::SeqCst), 1);
    assert_eq!(pipeline.sentiment_cache().list().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_universe_is_terminal() {
    let sentiment = CountingSentiment::default();
    let empty = universe().head(Some(0));
    let config = config("empty");
    let out_dir = config.output.dir.clone();
    let pipeline = pipeline(config, empty, sentiment.clone());

    assert_eq!(
        pipeline.run("20240628_153000").await.unwrap(),
        ScreeningOutcome::EmptyUniverse
    );
    assert_eq!(sentiment.calls.load(Ordering::SeqCst), 0);
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn no_candidates_is_reported() {
    let mut config = config("none");
    config.screening.min_focus_score = 100.5;
    let pipeline = pipeline(config, universe(), CountingSentiment::default());

    let outcome = pipeline.run("20240628_153000").await.unwrap();
    assert_eq!(outcome, ScreeningOutcome::NoCandidates { universe: 13 });
    assert!(outcome.to_string().contains("13"));
}

#[tokio::test]
async fn sentiment_can_be_disabled() {
    let mut config = config("disabled");
    config.sentiment.enabled = false;
    let sentiment = CountingSentiment::default();
    let pipeline = pipeline(config, universe(), sentiment.clone());

    let ScreeningOutcome::Completed(run) = pipeline.run("20240628_153000").await.unwrap() else {
        panic!("expected a completed run");
    };
    assert!(run.rows.iter().all(|r| r.name.is_none()));
    assert_eq!(sentiment.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_translation_file_fails_construction() {
    let mut config = config("translations");
    config.translations = Some(PathBuf::from("/nonexistent/sector_translations.json"));
    let result = Pipeline::new(
        config,
        StaticScanner { table: universe() },
        CountingSentiment::default(),
    );
    assert!(result.is_err());
}
