//! FRED observation values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated value of a FRED series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Numeric value, or `None` when FRED reports it as missing (`"."`).
    pub value: Option<f64>,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }

    /// Coerces a raw FRED value string into a number.
    ///
    /// Anything that does not parse as a finite float becomes `None`.
    #[must_use]
    pub fn parse_value(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Returns true if the value is missing.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(Observation::parse_value("4.25").unwrap(), 4.25);
        assert_relative_eq!(Observation::parse_value(" 27610.128 ").unwrap(), 27610.128);
        assert_eq!(Observation::parse_value("."), None);
        assert_eq!(Observation::parse_value(""), None);
        assert_eq!(Observation::parse_value("NaN"), None);
    }

    #[test]
    fn test_missing() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(Observation::new(date, None).is_missing());
        assert!(!Observation::new(date, Some(1.0)).is_missing());
    }
}
