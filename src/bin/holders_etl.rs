use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use idx_holders_etl::config::EtlConfig;
use idx_holders_etl::csv_pipeline::{backfill, run_for_date};
use idx_holders_etl::models::DateReport;
use idx_holders_etl::schedule::{dates_between, parse_date_arg, target_date_now};
use idx_holders_etl::source::LocalDirSource;
use idx_holders_etl::upload::LocalDirSink;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "holders-etl",
    version,
    about = "Collect IDX 5% shareholder disclosures into date-partitioned CSV objects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Process one disclosure date (default: the daily target date).
    Run(RunArgs),
    /// Process every date in an inclusive range.
    Backfill(BackfillArgs),
}

#[derive(Debug, Args)]
struct StorageArgs {
    /// Directory holding downloaded `YYYYMMDD…_lamp….pdf` attachments.
    #[arg(long)]
    input_dir: PathBuf,

    /// Directory the CSV objects are written under.
    #[arg(long)]
    output_dir: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Disclosure date, YYYYMMDD or YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,

    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Debug, Args)]
struct BackfillArgs {
    /// First date, YYYYMMDD or YYYY-MM-DD.
    #[arg(long)]
    start: String,

    /// Last date, inclusive.
    #[arg(long)]
    end: String,

    /// Worker threads, overriding the configured value.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Debug, Serialize)]
struct BackfillSummary {
    dates: usize,
    failed: usize,
    reports: Vec<DateReport>,
}

fn load_config(storage: &StorageArgs) -> Result<EtlConfig> {
    match &storage.config {
        Some(path) => EtlConfig::from_path(path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => Ok(EtlConfig::default()),
    }
}

fn run_once(args: &RunArgs) -> Result<String> {
    let config = load_config(&args.storage)?;
    let date = match args.date.as_deref() {
        Some(raw) => parse_date_arg(raw)?,
        None => target_date_now(),
    };

    let source = LocalDirSource::new(&args.storage.input_dir);
    let sink = LocalDirSink::new(&args.storage.output_dir);
    let outcome = run_for_date(date, &source, &sink, &config)
        .with_context(|| format!("run for {date} failed"))?;
    Ok(serde_json::to_string_pretty(&outcome)?)
}

fn run_backfill(args: &BackfillArgs) -> Result<String> {
    let mut config = load_config(&args.storage)?;
    if let Some(threads) = args.threads {
        config.workers = threads;
    }
    config.validate()?;

    let start = parse_date_arg(&args.start)?;
    let end = parse_date_arg(&args.end)?;
    let dates = dates_between(start, end);
    if dates.is_empty() {
        anyhow::bail!("backfill range is empty: {start} is after {end}");
    }

    let source = LocalDirSource::new(&args.storage.input_dir);
    let sink = LocalDirSink::new(&args.storage.output_dir);
    let reports = backfill(&dates, &source, &sink, &config);

    let summary = BackfillSummary {
        dates: reports.len(),
        failed: reports.iter().filter(|report| report.is_failure()).count(),
        reports,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("idx_holders_etl=info,idx_holders_to_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Run(args) => run_once(args),
        Commands::Backfill(args) => run_backfill(args),
    };

    match result {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
