//! Turns the IDX "Pemegang Saham di atas 5%" PDF attachment into a
//! normalized shareholder dataset plus the subset whose ownership moved.

mod assemble;
mod changes;
mod coerce;
mod csv_out;
mod error;
mod extractor;
mod header;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod schema;
mod table_parse;
mod warning;

use std::path::Path;

use tracing::info;

use crate::assemble::assemble_rows;
use crate::pdf_reader::{read_pdf_pages, read_pdf_pages_from_bytes};

pub use changes::{ChangeSet, detect_changes};
pub use coerce::coerce_types;
pub use csv_out::{write_csv, write_csv_to_string};
pub use error::ExtractError;
pub use extractor::{PageTableExtractor, TextGridExtractor, load_page_grids_json};
pub use header::{HeaderLayout, RawSpan, reconstruct_header};
pub use model::{
    Dataset, ExtractedPage, PageTable, PageText, RawCell, RawDataset, RawRow, ShareholderRecord,
    Value,
};
pub use normalize::{forward_fill, normalize_columns};
pub use options::ExtractOptions;
pub use schema::{
    Column, ColumnKind, ColumnRules, ColumnSpec, DisclosureDate, GroupingField, Measure,
    NumericColumns,
};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsReport {
    pub dataset: Dataset,
    pub changes: ChangeSet,
    pub warnings: Vec<ExtractWarning>,
}

impl HoldingsReport {
    /// Records of every issuer whose percentage moved, same columns as the
    /// full dataset.
    #[must_use]
    pub fn changed_dataset(&self) -> Dataset {
        self.changes.changed_subset(&self.dataset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Holdings(HoldingsReport),
    /// No shareholder rows in the document. Not an error.
    Empty { warnings: Vec<ExtractWarning> },
}

impl Extraction {
    #[must_use]
    pub fn warnings(&self) -> &[ExtractWarning] {
        match self {
            Self::Holdings(report) => &report.warnings,
            Self::Empty { warnings } => warnings,
        }
    }
}

pub fn extract_holdings_from_pages(
    pages: &[ExtractedPage],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    options.validate()?;

    let mut warnings = Vec::new();
    let Some(raw) = assemble_rows(pages, options, &mut warnings)? else {
        info!(pages = pages.len(), "no table found after the leading pages");
        return Ok(Extraction::Empty { warnings });
    };
    if raw.rows.is_empty() {
        info!(pages = pages.len(), "tables carry no data rows");
        return Ok(Extraction::Empty { warnings });
    }

    let raw = normalize_columns(raw, &mut warnings);
    let dataset = coerce_types(raw, options.numeric_columns, &mut warnings);
    let changes = detect_changes(&dataset)?;

    info!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        changed_issuers = changes.len(),
        warnings = warnings.len(),
        "extracted shareholder dataset"
    );

    Ok(Extraction::Holdings(HoldingsReport {
        dataset,
        changes,
        warnings,
    }))
}

pub fn extract_holdings_with<E: PageTableExtractor + ?Sized>(
    input_pdf: &[u8],
    extractor: &E,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    options.validate()?;
    let pages = read_pdf_pages_from_bytes(input_pdf)?;
    extract_holdings_from_pages(&extractor.extract_pages(&pages), options)
}

pub fn extract_holdings_from_bytes(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let extractor = TextGridExtractor::from_options(options);
    extract_holdings_with(input_pdf, &extractor, options)
}

pub fn extract_holdings_from_path(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    options.validate()?;
    let pages = read_pdf_pages(input_pdf)?;
    let extractor = TextGridExtractor::from_options(options);
    extract_holdings_from_pages(&extractor.extract_pages(&pages), options)
}
