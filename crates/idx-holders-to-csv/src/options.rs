use crate::error::ExtractError;
use crate::schema::{ColumnRules, NumericColumns};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leading pages never read for data (the cover/summary page).
    pub skip_leading_pages: usize,
    /// Rows at the top of every page's table treated as header region.
    pub header_rows: usize,
    /// Minimum cells for a text line to be taken as a table header.
    pub min_cols: usize,
    pub delimiter: u8,
    pub numeric_columns: NumericColumns,
    pub column_rules: ColumnRules,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_leading_pages: 1,
            header_rows: 2,
            min_cols: 3,
            delimiter: b',',
            numeric_columns: NumericColumns::HoldingBlock,
            column_rules: ColumnRules::default(),
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.min_cols < 2 {
            return Err(ExtractError::InvalidOption(
                "min_cols must be at least 2".to_string(),
            ));
        }
        if self.header_rows == 0 {
            return Err(ExtractError::InvalidOption(
                "header_rows must be at least 1".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() || self.delimiter == b'"' {
            return Err(ExtractError::InvalidOption(format!(
                "unsupported delimiter byte {:#04x}",
                self.delimiter
            )));
        }
        if self.column_rules.sequence.is_empty() {
            return Err(ExtractError::InvalidOption(
                "column rules need at least one sequence label".to_string(),
            ));
        }
        Ok(())
    }
}
