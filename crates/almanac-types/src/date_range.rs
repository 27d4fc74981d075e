//! Open-ended date windows.

use chrono::NaiveDate;

use crate::DateRangeError;

/// Date format accepted on the command line and sent to providers.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date window for data retrieval.
///
/// Either bound may be left open: a missing start means "earliest available",
/// a missing end means "latest available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// Start date (inclusive), or `None` for the beginning of the series.
    pub start: Option<NaiveDate>,
    /// End date (inclusive), or `None` for the latest data.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end when both are set.
    ///
    /// # Errors
    ///
    /// Returns an error if end is before start.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, DateRangeError> {
        match (start, end) {
            (Some(start), Some(end)) if end < start => {
                Err(DateRangeError::InvalidRange { start, end })
            }
            _ => Ok(Self { start, end }),
        }
    }

    /// A range with both bounds open (full history).
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Parses optional `YYYY-MM-DD` strings into a range.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is malformed or the range is inverted.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DateRangeError> {
        Self::new(
            start.map(parse_date).transpose()?,
            end.map(parse_date).transpose()?,
        )
    }

    /// Returns true when neither bound is set.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Start bound as sent to providers, if any.
    #[must_use]
    pub fn start_param(&self) -> Option<String> {
        self.start.map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// End bound as sent to providers, if any.
    #[must_use]
    pub fn end_param(&self) -> Option<String> {
        self.end.map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// Label used in file names for the start bound.
    #[must_use]
    pub fn start_label(&self) -> String {
        self.start_param().unwrap_or_else(|| "FULL".to_string())
    }

    /// Label used in file names for the end bound.
    #[must_use]
    pub fn end_label(&self) -> String {
        self.end_param().unwrap_or_else(|| "LATEST".to_string())
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = self.start_param().unwrap_or_else(|| "beginning".to_string());
        let end = self.end_param().unwrap_or_else(|| "latest".to_string());
        write!(f, "{start} -> {end}")
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
}
