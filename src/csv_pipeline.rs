use chrono::NaiveDate;
use idx_holders_to_csv::{Extraction, extract_holdings_from_bytes, write_csv_to_string};
use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, warn};

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::models::{CSV_CONTENT_TYPE, DateReport, RunOutcome};
use crate::source::DocumentSource;
use crate::upload::{ObjectSink, changes_object_key, full_object_key};

/// Fetch, extract and upload the disclosure of one date. A document without
/// shareholder rows uploads nothing.
pub fn run_for_date<S, K>(
    date: NaiveDate,
    source: &S,
    sink: &K,
    config: &EtlConfig,
) -> Result<RunOutcome, EtlError>
where
    S: DocumentSource + ?Sized,
    K: ObjectSink + ?Sized,
{
    let document = source.fetch(date)?;
    info!(
        file = %document.file_name,
        size = document.bytes.len(),
        %date,
        "fetched disclosure document"
    );

    let options = config.extract_options();
    let report = match extract_holdings_from_bytes(&document.bytes, &options)? {
        Extraction::Holdings(report) => report,
        Extraction::Empty { warnings } => {
            info!(
                file = %document.file_name,
                warnings = warnings.len(),
                "no shareholder rows found"
            );
            return Ok(RunOutcome::NoData {
                document: document.file_name,
            });
        }
    };

    for warning in &report.warnings {
        warn!(
            file = %document.file_name,
            code = ?warning.code,
            page = ?warning.page,
            column = ?warning.column,
            count = ?warning.count,
            "{}",
            warning.message
        );
    }

    let changed = report.changed_dataset();
    let full_csv = write_csv_to_string(&report.dataset, options.delimiter)?;
    let changes_csv = write_csv_to_string(&changed, options.delimiter)?;

    let base_name = document.base_name();
    let full_key = full_object_key(&config.full_prefix, date, base_name);
    let changes_key = changes_object_key(&config.changes_prefix, date, base_name);
    sink.put(&full_key, full_csv.as_bytes(), CSV_CONTENT_TYPE)?;
    if let Err(error) = sink.put(&changes_key, changes_csv.as_bytes(), CSV_CONTENT_TYPE) {
        warn!(
            orphaned = %full_key,
            missing = %changes_key,
            %error,
            "changes upload failed after the full dataset was stored"
        );
        return Err(error);
    }

    info!(
        file = %document.file_name,
        full_rows = report.dataset.len(),
        changed_rows = changed.len(),
        "uploaded shareholder datasets"
    );

    Ok(RunOutcome::Uploaded {
        document: document.file_name.clone(),
        full_rows: report.dataset.len(),
        changed_rows: changed.len(),
        keys: vec![full_key, changes_key],
    })
}

fn date_report(date: NaiveDate, result: Result<RunOutcome, EtlError>) -> DateReport {
    match result {
        Ok(outcome) => DateReport {
            date,
            outcome: Some(outcome),
            error: None,
        },
        Err(error) => {
            warn!(%date, %error, "run failed");
            DateReport {
                date,
                outcome: None,
                error: Some(error.to_response()),
            }
        }
    }
}

/// Runs every date on a pool of at most `config.workers` threads. A failed
/// date is reported in its own entry; reports keep the order of `dates`.
pub fn backfill<S, K>(
    dates: &[NaiveDate],
    source: &S,
    sink: &K,
    config: &EtlConfig,
) -> Vec<DateReport>
where
    S: DocumentSource + Sync + ?Sized,
    K: ObjectSink + Sync + ?Sized,
{
    let run = |date: &NaiveDate| date_report(*date, run_for_date(*date, source, sink, config));
    let threads = config.workers.clamp(1, dates.len().max(1));
    info!(dates = dates.len(), threads, "starting backfill");

    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(|pool| pool.install(|| dates.par_iter().map(run).collect::<Vec<_>>()))
        .unwrap_or_else(|error| {
            warn!(%error, "failed to build worker pool, running sequentially");
            dates.iter().map(run).collect()
        })
}
