//! Error types for almanac.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for almanac operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;

/// Errors that can occur while downloading and saving open data.
#[derive(Error, Debug)]
pub enum AlmanacError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Required API key is not configured.
    #[error("{var} not set; add it to your .env file")]
    MissingApiKey {
        /// Name of the environment variable that should hold the key.
        var: String,
    },

    /// Series identifier not known to the provider.
    #[error("Invalid or missing series ID: {0}")]
    UnknownSeries(String),

    /// Ticker symbol is empty or malformed.
    #[error("Invalid ticker symbol: '{0}'")]
    InvalidTicker(String),

    /// Provider identifier not recognised.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// The provider returned no data for the request.
    #[error("No data returned for {subject}")]
    NoData {
        /// What was requested (series id, ticker, endpoint).
        subject: String,
    },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// End date is before start date.
    #[error("End date {end} cannot be before start date {start}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
