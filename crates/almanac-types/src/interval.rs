//! Bar interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar interval accepted by the Yahoo Finance chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 1-minute bars.
    #[serde(rename = "1m")]
    Minute1,
    /// 2-minute bars.
    #[serde(rename = "2m")]
    Minute2,
    /// 5-minute bars.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "30m")]
    Minute30,
    /// 60-minute bars.
    #[serde(rename = "60m")]
    Minute60,
    /// 90-minute bars.
    #[serde(rename = "90m")]
    Minute90,
    /// Hourly bars.
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars.
    #[default]
    #[serde(rename = "1d")]
    Day1,
    /// 5-day bars.
    #[serde(rename = "5d")]
    Day5,
    /// Weekly bars.
    #[serde(rename = "1wk")]
    Week1,
    /// Monthly bars.
    #[serde(rename = "1mo")]
    Month1,
    /// Quarterly bars.
    #[serde(rename = "3mo")]
    Month3,
}

impl Interval {
    /// Returns true for minute and hour intervals.
    ///
    /// Yahoo only serves intraday history for a limited look-back window.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        matches!(
            self,
            Self::Minute1
                | Self::Minute2
                | Self::Minute5
                | Self::Minute15
                | Self::Minute30
                | Self::Minute60
                | Self::Minute90
                | Self::Hour1
        )
    }

    /// Returns the interval as sent to Yahoo.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute2 => "2m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Minute60 => "60m",
            Self::Minute90 => "90m",
            Self::Hour1 => "1h",
            Self::Day1 => "1d",
            Self::Day5 => "5d",
            Self::Week1 => "1wk",
            Self::Month1 => "1mo",
            Self::Month3 => "3mo",
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute2,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Minute60,
            Self::Minute90,
            Self::Hour1,
            Self::Day1,
            Self::Day5,
            Self::Week1,
            Self::Month1,
            Self::Month3,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|i| i.as_str() == lower)
            .ok_or_else(|| IntervalParseError(s.to_string()))
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
