use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to read page grids: {0}")]
    GridJson(#[from] serde_json::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("document has no pages")]
    EmptyPdf,

    #[error(
        "row {row} on page {page} has {actual} cells but the reconstructed header has {expected} columns: {cells:?}"
    )]
    SchemaCardinalityMismatch {
        page: u32,
        row: usize,
        expected: usize,
        actual: usize,
        cells: Vec<String>,
    },

    #[error("change detection needs two ownership percentage columns, found {found}")]
    InsufficientPercentageColumns { found: usize },

    #[error("no {role} column in the reconstructed header")]
    MissingColumn { role: &'static str },
}

impl ExtractError {
    /// Errors that mean the source layout changed rather than a row being
    /// misparsed.
    #[must_use]
    pub fn is_schema_evolution(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPercentageColumns { .. } | Self::MissingColumn { .. }
        )
    }
}
