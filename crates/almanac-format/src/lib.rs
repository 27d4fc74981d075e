//! Output formatters for the almanac open-data downloader.
//!
//! This crate provides writers for downloaded data:
//!
//! - [`CsvFormatter`] - CSV / TSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format
//! - [`TableWriter`] - Streaming CSV for row-oriented data of unknown shape

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/almanac-data/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod table;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle, write_metadata};
pub use table::{TableWriter, write_table};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
