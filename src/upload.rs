use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EtlError;
use crate::schedule::hive_partition;

pub trait ObjectSink {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), EtlError>;
}

pub fn full_object_key(prefix: &str, date: NaiveDate, base_name: &str) -> String {
    format!(
        "{}/{}/{base_name}_full.csv",
        prefix.trim_end_matches('/'),
        hive_partition(date)
    )
}

pub fn changes_object_key(prefix: &str, date: NaiveDate, base_name: &str) -> String {
    format!(
        "{}/{}/{base_name}.csv",
        prefix.trim_end_matches('/'),
        hive_partition(date)
    )
}

/// Writes every object key as a relative path under `root`.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    pub root: PathBuf,
}

impl LocalDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, EtlError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(EtlError::Validation(format!("invalid object key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectSink for LocalDirSink {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), EtlError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        debug!(key, content_type, size = bytes.len(), "stored object");
        Ok(())
    }
}
