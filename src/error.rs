use std::fmt::{Display, Formatter};

use idx_holders_to_csv::ExtractError;

use crate::models::ErrorResponse;

#[derive(Debug)]
pub enum EtlError {
    NotFound(String),
    Upstream(String),
    Parse(String),
    Schema(String),
    Validation(String),
    Storage(String),
}

impl EtlError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Upstream(_) => "upstream_error",
            Self::Parse(_) => "parse_error",
            Self::Schema(_) => "schema_error",
            Self::Validation(_) => "validation_error",
            Self::Storage(_) => "storage_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message)
            | Self::Upstream(message)
            | Self::Parse(message)
            | Self::Schema(message)
            | Self::Validation(message)
            | Self::Storage(message) => message,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message().to_string(),
        }
    }
}

impl Display for EtlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for EtlError {}

impl From<ExtractError> for EtlError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::InvalidOption(_) => Self::Validation(error.to_string()),
            ExtractError::Io(_) => Self::Storage(error.to_string()),
            ExtractError::SchemaCardinalityMismatch { .. } => Self::Schema(error.to_string()),
            _ if error.is_schema_evolution() => Self::Schema(error.to_string()),
            _ => Self::Parse(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for EtlError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

impl From<url::ParseError> for EtlError {
    fn from(error: url::ParseError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<chrono::ParseError> for EtlError {
    fn from(error: chrono::ParseError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<std::io::Error> for EtlError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}
