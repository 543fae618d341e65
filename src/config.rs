//! Run configuration, read from an optional JSON file. Every field has a
//! default, so `{}` is a complete configuration.

use std::path::Path;

use idx_holders_to_csv::{ExtractOptions, NumericColumns};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::EtlError;
use crate::models::DEFAULT_ANNOUNCEMENT_BASE_URL;
use crate::source::{AnnouncementSource, Transport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Object key prefix for the full dataset.
    #[serde(default = "default_full_prefix")]
    pub full_prefix: String,

    /// Object key prefix for the changed subset.
    #[serde(default = "default_changes_prefix")]
    pub changes_prefix: String,

    /// Worker threads for backfills.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Announcement listing endpoint queried by [`EtlConfig::announcement_source`].
    #[serde(default = "default_announcement_base_url")]
    pub announcement_base_url: String,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            full_prefix: default_full_prefix(),
            changes_prefix: default_changes_prefix(),
            workers: default_workers(),
            announcement_base_url: default_announcement_base_url(),
            extraction: ExtractionConfig::default(),
        }
    }
}

fn default_full_prefix() -> String {
    "stock_market/data_kepentingan".into()
}
fn default_changes_prefix() -> String {
    "stock_market/data_kepentingan_changes".into()
}
fn default_workers() -> usize {
    5
}
fn default_announcement_base_url() -> String {
    DEFAULT_ANNOUNCEMENT_BASE_URL.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_skip_leading_pages")]
    pub skip_leading_pages: usize,

    #[serde(default = "default_header_rows")]
    pub header_rows: usize,

    #[serde(default = "default_min_cols")]
    pub min_cols: usize,

    /// Coerce only the last N columns instead of the whole holding block.
    #[serde(default)]
    pub numeric_tail: Option<usize>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            skip_leading_pages: default_skip_leading_pages(),
            header_rows: default_header_rows(),
            min_cols: default_min_cols(),
            numeric_tail: None,
        }
    }
}

fn default_skip_leading_pages() -> usize {
    1
}
fn default_header_rows() -> usize {
    2
}
fn default_min_cols() -> usize {
    3
}

impl EtlConfig {
    pub fn from_path(path: &Path) -> Result<Self, EtlError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EtlError> {
        if self.workers == 0 {
            return Err(EtlError::Validation(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.full_prefix.trim_matches('/') == self.changes_prefix.trim_matches('/') {
            return Err(EtlError::Validation(
                "full and changes prefixes must differ".to_string(),
            ));
        }
        Url::parse(&self.announcement_base_url)?;
        self.extract_options().validate()?;
        Ok(())
    }

    #[must_use]
    pub fn announcement_source<T: Transport>(&self, transport: T) -> AnnouncementSource<T> {
        AnnouncementSource::new(transport, self.announcement_base_url.clone())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            skip_leading_pages: self.extraction.skip_leading_pages,
            header_rows: self.extraction.header_rows,
            min_cols: self.extraction.min_cols,
            numeric_columns: self
                .extraction
                .numeric_tail
                .map_or(NumericColumns::HoldingBlock, NumericColumns::Trailing),
            ..ExtractOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use idx_holders_to_csv::NumericColumns;

    use super::EtlConfig;

    #[test]
    fn empty_object_yields_defaults() {
        let config: EtlConfig = serde_json::from_str("{}").expect("config should parse");
        assert_eq!(config, EtlConfig::default());
        assert_eq!(config.full_prefix, "stock_market/data_kepentingan");
        assert_eq!(config.workers, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn numeric_tail_selects_trailing_columns() {
        let config: EtlConfig =
            serde_json::from_str(r#"{"extraction": {"numeric_tail": 7}}"#).expect("config");
        assert_eq!(
            config.extract_options().numeric_columns,
            NumericColumns::Trailing(7)
        );
        assert_eq!(config.extract_options().header_rows, 2);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = EtlConfig {
            workers: 0,
            ..EtlConfig::default()
        };
        let err = config.validate().expect_err("zero workers");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn malformed_announcement_url_is_rejected() {
        let config: EtlConfig =
            serde_json::from_str(r#"{"announcement_base_url": "not a url"}"#).expect("config");
        let err = config.validate().expect_err("relative url");
        assert_eq!(err.code(), "validation_error");
    }
}
