//! HTTP clients for the almanac open-data downloader.
//!
//! This crate provides the download pipeline for each provider:
//!
//! - [`HttpClient`] - Shared client with request spacing and retries
//! - [`Credentials`] - API keys loaded from the environment or a `.env` file
//! - [`FredClient`] - FRED series metadata, observations, search and categories
//! - [`Crawler`] - Depth-first walk of the FRED category tree
//! - [`EiaClient`] - Paginated EIA v2 downloads as a stream of pages
//! - [`YahooClient`] - Yahoo Finance chart bars

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/almanac-data/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod crawl;
mod credentials;
mod eia;
mod fred;
pub mod url;
mod yahoo;

#[cfg(test)]
mod testing;

pub use client::{Backoff, ClientConfig, FetchError, HttpClient};
pub use crawl::{CategorySource, CrawlReport, CrawlStep, Crawler, DEFAULT_CHECKPOINT_EVERY};
pub use credentials::{ApiKey, Credentials};
pub use eia::{EIA_PAGE_SIZE, EiaClient, EiaPage, EiaRequest, table_headers, table_row};
pub use fred::{FRED_PAGE_LIMIT, FredClient};
pub use yahoo::{ChartPlan, INTRADAY_LOOKBACK_DAYS, Period, YahooClient};
