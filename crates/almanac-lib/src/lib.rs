//! Download open economic and market data from FRED, EIA and Yahoo Finance.
//!
//! This is a facade crate that re-exports functionality from the almanac
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use almanac_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::load(None)?;
//!     let http = HttpClient::new(ClientConfig::fred())?;
//!     let fred = FredClient::new(http, credentials.require(ProviderId::Fred)?.clone());
//!
//!     let range = DateRange::parse(Some("2020-01-01"), None)?;
//!     let observations = fred.observations("DGS10", &range).await?;
//!     println!("Downloaded {} observations", observations.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/almanac-data/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use almanac_types::*;

// Re-export the provider catalog
pub use almanac_catalog::{Catalog, KnownSeries, Provider};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use almanac_fetch::{
    ApiKey, Backoff, CategorySource, ChartPlan, ClientConfig, CrawlReport, CrawlStep, Crawler,
    Credentials, DEFAULT_CHECKPOINT_EVERY, EIA_PAGE_SIZE, EiaClient, EiaPage, EiaRequest,
    FRED_PAGE_LIMIT, FetchError, FredClient, HttpClient, INTRADAY_LOOKBACK_DAYS, Period,
    YahooClient, table_headers, table_row, url,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use almanac_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, TableWriter,
    write_metadata, write_table,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use almanac_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use almanac_lib::prelude::*;
/// ```
pub mod prelude {
    pub use almanac_types::{
        AlmanacError, Bar, Category, DateRange, DateRangeError, Interval, Observation,
        ProviderId, Record, Result, SeriesMetadata,
    };

    pub use almanac_catalog::Catalog;

    #[cfg(feature = "fetch")]
    pub use almanac_fetch::{
        ChartPlan, ClientConfig, Crawler, Credentials, EiaClient, EiaRequest, FredClient,
        HttpClient, YahooClient,
    };

    #[cfg(feature = "format")]
    pub use almanac_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat, TableWriter};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use almanac_format::ParquetFormatter;
}
