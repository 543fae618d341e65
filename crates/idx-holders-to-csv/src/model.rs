use crate::schema::ColumnSpec;

/// One table position as handed over by a [`crate::PageTableExtractor`].
pub type RawCell = Option<String>;
pub type RawRow = Vec<RawCell>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Rows of one page's table. The first rows are conventionally header rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageTable {
    pub rows: Vec<RawRow>,
}

impl PageTable {
    #[must_use]
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub page_number: u32,
    pub table: Option<PageTable>,
}

/// Assembled rows before type coercion, aligned to `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataset {
    pub columns: ColumnSpec,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Text(String),
    Number(f64),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Numeric view with the same zero default the coercer applies.
    #[must_use]
    pub fn number_or_zero(&self) -> f64 {
        match self {
            Self::Number(number) => *number,
            Self::Text(text) => text.parse::<f64>().unwrap_or(0.0),
            Self::Missing => 0.0,
        }
    }

    #[must_use]
    pub fn to_field(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareholderRecord {
    values: Vec<Value>,
}

impl ShareholderRecord {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: ColumnSpec,
    records: Vec<ShareholderRecord>,
}

impl Dataset {
    #[must_use]
    pub fn new(columns: ColumnSpec, records: Vec<ShareholderRecord>) -> Self {
        Self { columns, records }
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[ShareholderRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value at `column` by canonical name.
    #[must_use]
    pub fn value(&self, record: usize, column: &str) -> Option<&Value> {
        let index = self.columns.position(column)?;
        self.records.get(record)?.get(index)
    }

    /// Same schema, only the records `keep` accepts.
    #[must_use]
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&ShareholderRecord) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| keep(record))
                .cloned()
                .collect(),
        }
    }
}

/// Trimmed cell text; `None` for cells that carry nothing.
pub(crate) fn cell_text(cell: &RawCell) -> Option<&str> {
    let text = cell.as_deref()?.trim();
    if text.is_empty() || text == "None" || text == "none" {
        None
    } else {
        Some(text)
    }
}

pub(crate) fn is_blank(cell: &RawCell) -> bool {
    cell_text(cell).is_none()
}
