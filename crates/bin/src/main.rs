//! Kestrel CLI binary.
//!
//! Provides the command-line interface for the Kestrel screener.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use kestrel::{KestrelConfig, Pipeline, ScreeningOutcome};
use kestrel_data::cache::timestamp_now;
use kestrel_data::sentiment::latest_snapshot;
use kestrel_data::{EastmoneyCommentProvider, TradingViewScanner};
use kestrel_factors::score::{FOCUS_WEIGHTS, VALUATION_CAP};
use kestrel_factors::{GroupKey, Metric};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(about = "Kestrel: industry-relative fundamental stock screener", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full screen and save the final list
    Screen {
        /// Fetch a fresh sentiment snapshot instead of using the cache
        #[arg(long)]
        refresh: bool,

        /// Directory for the final list
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Sector translation table (JSON)
        #[arg(long)]
        translations: Option<PathBuf>,

        /// Column used to group stocks for ranking
        #[arg(long, value_enum)]
        group_key: Option<GroupArg>,

        /// Skip the sentiment join
        #[arg(long)]
        no_sentiment: bool,

        /// Rows shown in the console table
        #[arg(long)]
        head: Option<usize>,
    },

    /// Inspect or refresh cached sentiment snapshots
    Sentiment {
        /// List cached snapshots
        #[arg(long)]
        list: bool,

        /// Fetch and cache a new snapshot
        #[arg(long)]
        refresh: bool,

        /// Rows to show, ordered by current rank
        #[arg(long, default_value = "10")]
        head: usize,
    },

    /// List ranked metrics and their focus score caps
    Metrics,

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupArg {
    Sector,
    Industry,
}

impl From<GroupArg> for GroupKey {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Sector => Self::Sector,
            GroupArg::Industry => Self::Industry,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = KestrelConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Screen {
            refresh,
            output_dir,
            translations,
            group_key,
            no_sentiment,
            head,
        } => {
            config.sentiment.force_refresh |= refresh;
            config.sentiment.enabled &= !no_sentiment;
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if translations.is_some() {
                config.translations = translations;
            }
            if let Some(key) = group_key {
                config.normalizer.group_key = key.into();
            }
            if let Some(head) = head {
                config.output.report_head = head;
            }
            run_screen(config).await?;
        }
        Commands::Sentiment {
            list,
            refresh,
            head,
        } => {
            config.sentiment.force_refresh |= refresh;
            run_sentiment(config, list, head).await?;
        }
        Commands::Metrics => print_metrics(),
        Commands::Config => println!("{}", config.to_json_pretty()?),
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {elapsed} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn sentiment_provider(
    config: &KestrelConfig,
) -> Result<EastmoneyCommentProvider, Box<dyn std::error::Error>> {
    Ok(EastmoneyCommentProvider::new()?
        .with_page_size(config.sentiment.page_size)
        .with_page_delay(config.sentiment.page_delay()))
}

async fn run_screen(config: KestrelConfig) -> Result<(), Box<dyn std::error::Error>> {
    let head = config.output.report_head;
    let sentiment = sentiment_provider(&config)?;
    let pipeline = Pipeline::new(config, TradingViewScanner::new()?, sentiment)?;
    let timestamp = timestamp_now();

    let pb = spinner("Screening universe...")?;
    let outcome = match pipeline.run(&timestamp).await {
        Ok(outcome) => {
            pb.finish_and_clear();
            outcome
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    if let ScreeningOutcome::Completed(run) = &outcome {
        println!("{}", run.report(head));
        println!();
    }
    println!("{outcome}");
    Ok(())
}

async fn run_sentiment(
    config: KestrelConfig,
    list: bool,
    head: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = kestrel_data::SnapshotCache::new(
        config.sentiment.resolved_cache_dir(),
        config.sentiment.file_prefix.clone(),
    );

    if list {
        let snapshots = cache.list()?;
        println!("Cache directory: {}", cache.dir().display());
        if snapshots.is_empty() {
            println!("  No cached snapshots");
        }
        for path in snapshots {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    let provider = sentiment_provider(&config)?;
    let pb = spinner("Loading sentiment snapshot...")?;
    let records = latest_snapshot(
        &cache,
        &provider,
        config.sentiment.force_refresh,
        &timestamp_now(),
    )
    .await;
    pb.finish_and_clear();
    let records = records?;
    info!(rows = records.len(), "sentiment snapshot ready");

    println!(
        "{:<8} {:<10} {:>8} {:>10} {:>8} {:>10}",
        "Code", "Name", "Rank", "Attention", "Cost", "Inst.(%)"
    );
    println!("{}", "-".repeat(60));
    let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
    for record in records.iter().take(head) {
        println!(
            "{:<8} {:<10} {:>8} {:>10} {:>8} {:>10}",
            record.code,
            record.name.as_deref().unwrap_or("-"),
            cell(record.current_rank),
            cell(record.attention_index),
            cell(record.main_cost),
            cell(record.institution_participation),
        );
    }
    println!("\n{} stocks in snapshot", records.len());
    Ok(())
}

fn print_metrics() {
    println!("{:<48} {:<18} {:>10}", "Rank column", "Metric", "Focus cap");
    println!("{}", "-".repeat(78));
    for metric in Metric::ALL {
        let cap = FOCUS_WEIGHTS
            .iter()
            .find(|(m, _)| *m == metric)
            .map_or_else(|| "-".to_string(), |(_, cap)| format!("{cap:.0}"));
        println!("{:<48} {:<18} {:>10}", metric.rank_column(), metric.label(), cap);
    }
    println!("{:<48} {:<18} {:>10}", "(PEG or P/E branch)", "Valuation", VALUATION_CAP);
}
