//! Price bar representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price bar from the Yahoo Finance chart endpoint.
///
/// Yahoo leaves gaps as `null` inside otherwise populated arrays, so every
/// price field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Close adjusted for splits and dividends.
    pub adj_close: Option<f64>,
    /// Traded volume.
    pub volume: Option<u64>,
}

impl Bar {
    /// Creates a bar with only a timestamp; prices are filled in by the caller.
    #[must_use]
    pub const fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close: None,
            adj_close: None,
            volume: None,
        }
    }

    /// Returns true if every price field is missing.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.open.is_none() && self.high.is_none() && self.low.is_none() && self.close.is_none()
    }

    /// Returns the price range (high - low), if both are known.
    #[must_use]
    pub fn range(&self) -> Option<f64> {
        Some(self.high? - self.low?)
    }
}
