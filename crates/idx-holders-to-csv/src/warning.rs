#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    NoTableOnPage,
    RecurringHeaderDropped,
    NumericCoercedToZero,
    UnfilledGroupingValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
    pub column: Option<String>,
    pub count: Option<usize>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            column: None,
            count: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
