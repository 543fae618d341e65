//! Daily collection of the IDX 5% shareholder disclosure: find the
//! attachment for a date, extract it, and store the full and changed
//! datasets under date partitions.

pub mod config;
pub mod csv_pipeline;
pub mod error;
pub mod models;
pub mod schedule;
pub mod source;
pub mod upload;
