//! EIA v2 response rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of an EIA v2 `response.data` array.
///
/// Column order is the order in which the API returned the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Column names in response order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns true if the record has the given column.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Renders a column as text; null and missing columns are empty.
    #[must_use]
    pub fn field(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The `period` column converted to a timestamp string.
    #[must_use]
    pub fn timestamp(&self) -> String {
        normalize_period(&self.field("period"))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Converts an hourly EIA period (`2024-12-31T00`) to `2024-12-31 00:00:00`.
///
/// Periods in any other shape (`2024-12`, `2024-12-31`, `2024`) are returned
/// unchanged.
#[must_use]
pub fn normalize_period(raw: &str) -> String {
    NaiveDateTime::parse_from_str(&format!("{raw}:00"), "%Y-%m-%dT%H:%M").map_or_else(
        |_| raw.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_hourly_period() {
        assert_eq!(normalize_period("2024-12-31T00"), "2024-12-31 00:00:00");
        assert_eq!(normalize_period("2024-06-01T17"), "2024-06-01 17:00:00");
    }

    #[test]
    fn test_normalize_other_periods_unchanged() {
        assert_eq!(normalize_period("2024-12"), "2024-12");
        assert_eq!(normalize_period("2024-12-31"), "2024-12-31");
        assert_eq!(normalize_period(""), "");
        assert_eq!(normalize_period("2024-12-31T25"), "2024-12-31T25");
    }

    #[test]
    fn test_keys_preserve_order() {
        let r = record(r#"{"period": "2024-12", "stateid": "TX", "county": "Harris", "value": 12.5}"#);
        let keys: Vec<_> = r.keys().collect();
        assert_eq!(keys, vec!["period", "stateid", "county", "value"]);
    }

    #[test]
    fn test_field_rendering() {
        let r = record(r#"{"period": "2024-12-31T05", "value": 12.5, "units": null, "flag": true}"#);
        assert_eq!(r.field("value"), "12.5");
        assert_eq!(r.field("units"), "");
        assert_eq!(r.field("missing"), "");
        assert_eq!(r.field("flag"), "true");
        assert_eq!(r.timestamp(), "2024-12-31 05:00:00");
    }
}
