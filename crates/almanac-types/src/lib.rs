//! Core types for the almanac open-data time series downloader.
//!
//! This crate provides the fundamental data structures used throughout almanac:
//!
//! - [`DateRange`] - Optional start/end window for a download
//! - [`Observation`] - A single dated FRED value
//! - [`SeriesMetadata`] - FRED series description (frequency, units, ...)
//! - [`Category`] - A node of the FRED category tree
//! - [`Record`] - One row of an EIA v2 response
//! - [`Bar`] - A Yahoo Finance price bar
//! - [`Interval`] - Bar interval for Yahoo chart downloads
//! - [`ProviderId`] - Identifies one of the supported data providers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/almanac-data/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod date_range;
mod error;
mod interval;
mod observation;
mod provider;
mod record;
mod series;

pub use bar::Bar;
pub use date_range::DateRange;
pub use error::{AlmanacError, DateRangeError, Result};
pub use interval::{Interval, IntervalParseError};
pub use observation::Observation;
pub use provider::{ProviderId, ProviderParseError};
pub use record::{Record, normalize_period};
pub use series::{Category, SeriesMetadata};
