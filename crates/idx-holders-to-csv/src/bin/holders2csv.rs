use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use idx_holders_to_csv::{
    ExtractOptions, ExtractWarning, Extraction, NumericColumns, extract_holdings_from_pages,
    extract_holdings_from_path, load_page_grids_json, write_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "holders2csv",
    version,
    about = "Extract the IDX 5% shareholder disclosure PDF into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract the full shareholder dataset, optionally with the changed subset.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path, or a JSON page-grid file with --grid-json.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path for the full dataset.
    #[arg(short, long)]
    output: PathBuf,

    /// Output CSV path for issuers whose ownership percentage moved.
    #[arg(long)]
    changes: Option<PathBuf>,

    /// Treat the input as pre-extracted page grids (JSON) instead of a PDF.
    #[arg(long)]
    grid_json: bool,

    /// Coerce only the last N columns to numbers instead of the holding block.
    #[arg(long)]
    numeric_tail: Option<usize>,

    /// Leading pages that never carry shareholder rows.
    #[arg(long, default_value_t = 1)]
    skip_pages: usize,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        skip_leading_pages: args.skip_pages,
        delimiter: args.delimiter as u8,
        numeric_columns: args
            .numeric_tail
            .map_or(NumericColumns::HoldingBlock, NumericColumns::Trailing),
        ..ExtractOptions::default()
    })
}

fn log_warnings(warnings: &[ExtractWarning], verbose: bool) {
    if warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", warnings.len());
    if verbose {
        for warning in warnings {
            eprintln!(
                "  - {:?} page={:?} column={:?} count={:?}: {}",
                warning.code, warning.page, warning.column, warning.count, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<Extraction> {
    let options = parse_options(args)?;

    let result = if args.grid_json {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open '{}'", args.input.display()))?;
        let pages = load_page_grids_json(BufReader::new(file))
            .with_context(|| format!("failed to read page grids from '{}'", args.input.display()))?;
        extract_holdings_from_pages(&pages, &options)
    } else {
        extract_holdings_from_path(&args.input, &options)
    };
    let extraction = result
        .with_context(|| format!("failed to extract holdings from '{}'", args.input.display()))?;

    if let Extraction::Holdings(report) = &extraction {
        write_csv(&args.output, &report.dataset, options.delimiter)
            .with_context(|| format!("failed to write '{}'", args.output.display()))?;
        if let Some(path) = &args.changes {
            write_csv(path, &report.changed_dataset(), options.delimiter)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
    }

    Ok(extraction)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("idx_holders_to_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(extraction) => {
                log_warnings(extraction.warnings(), args.verbose);
                match extraction {
                    Extraction::Holdings(report) => {
                        eprintln!(
                            "wrote {} row(s), {} issuer(s) changed",
                            report.dataset.len(),
                            report.changes.len()
                        );
                        ExitCode::SUCCESS
                    }
                    Extraction::Empty { .. } => {
                        eprintln!("no shareholder rows found");
                        ExitCode::from(2)
                    }
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
