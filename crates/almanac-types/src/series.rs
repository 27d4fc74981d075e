//! FRED series and category descriptions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DateRange;

/// Maximum length of the title fragment used in file names.
const TITLE_STEM_LEN: usize = 60;

/// Leading columns of a series table.
const MODELLED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "observation_start",
    "observation_end",
    "frequency",
    "frequency_short",
    "units",
    "units_short",
    "seasonal_adjustment",
    "seasonal_adjustment_short",
    "last_updated",
    "popularity",
    "notes",
];

/// Metadata for a FRED series, as returned by `/fred/series`.
///
/// Fields the crate does not model explicitly are kept in [`extra`](Self::extra)
/// so that the metadata can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    /// Series identifier (e.g. `GDP`, `DGS10`).
    pub id: String,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First available observation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_start: Option<String>,
    /// Last available observation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_end: Option<String>,
    /// Frequency, e.g. `Quarterly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Abbreviated frequency, e.g. `Q`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_short: Option<String>,
    /// Units, e.g. `Billions of Dollars`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Abbreviated units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_short: Option<String>,
    /// Seasonal adjustment description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_adjustment: Option<String>,
    /// Abbreviated seasonal adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_adjustment_short: Option<String>,
    /// Last update timestamp as reported by FRED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// FRED popularity score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<i64>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeriesMetadata {
    /// Creates metadata with only an identifier and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            observation_start: None,
            observation_end: None,
            frequency: None,
            frequency_short: None,
            units: None,
            units_short: None,
            seasonal_adjustment: None,
            seasonal_adjustment_short: None,
            last_updated: None,
            popularity: None,
            notes: None,
            extra: Map::new(),
        }
    }

    /// Frequency tag used in file names (`Q`, `M`, `D`, ...).
    #[must_use]
    pub fn frequency_tag(&self) -> String {
        self.frequency_short
            .as_deref()
            .or(self.frequency.as_deref())
            .unwrap_or("unknown")
            .replace(' ', "")
    }

    /// Title made safe for use in a file name.
    #[must_use]
    pub fn clean_title(&self) -> String {
        self.title
            .as_deref()
            .unwrap_or("series")
            .replace('/', "-")
            .replace(' ', "_")
            .chars()
            .take(TITLE_STEM_LEN)
            .collect()
    }

    /// File stem for a download of this series over `range`.
    ///
    /// Format: `{id}_{frequency}_{start}_{end}_{title}`.
    #[must_use]
    pub fn file_stem(&self, range: &DateRange) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.id,
            self.frequency_tag(),
            range.start_label(),
            range.end_label(),
            self.clean_title()
        )
    }

    /// A single field rendered as text, modelled or not.
    ///
    /// Absent and null fields render as an empty string.
    #[must_use]
    pub fn field(&self, name: &str) -> String {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match name {
            "id" => self.id.clone(),
            "title" => opt(&self.title),
            "observation_start" => opt(&self.observation_start),
            "observation_end" => opt(&self.observation_end),
            "frequency" => opt(&self.frequency),
            "frequency_short" => opt(&self.frequency_short),
            "units" => opt(&self.units),
            "units_short" => opt(&self.units_short),
            "seasonal_adjustment" => opt(&self.seasonal_adjustment),
            "seasonal_adjustment_short" => opt(&self.seasonal_adjustment_short),
            "last_updated" => opt(&self.last_updated),
            "popularity" => self.popularity.map(|p| p.to_string()).unwrap_or_default(),
            "notes" => opt(&self.notes),
            other => match self.extra.get(other) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
            },
        }
    }

    /// Field values for a table with the given columns.
    #[must_use]
    pub fn table_row(&self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|h| self.field(h)).collect()
    }

    /// Columns for a table of `series`.
    ///
    /// The modelled fields come first, followed by every other field any
    /// series carries, in first-seen order. No field is dropped.
    #[must_use]
    pub fn table_headers(series: &[Self]) -> Vec<String> {
        let mut headers: Vec<String> = MODELLED_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        for meta in series {
            for key in meta.extra.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
        headers
    }
}

/// A node of the FRED category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier (`0` is the root).
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Parent category identifier.
    #[serde(default)]
    pub parent_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GDP_JSON: &str = r#"{
        "id": "GDP",
        "realtime_start": "2024-06-01",
        "realtime_end": "2024-06-01",
        "title": "Gross Domestic Product",
        "observation_start": "1947-01-01",
        "observation_end": "2024-01-01",
        "frequency": "Quarterly",
        "frequency_short": "Q",
        "units": "Billions of Dollars",
        "units_short": "Bil. of $",
        "seasonal_adjustment": "Seasonally Adjusted Annual Rate",
        "seasonal_adjustment_short": "SAAR",
        "last_updated": "2024-05-30 07:55:01-05",
        "popularity": 93,
        "notes": "BEA Account Code: A191RC"
    }"#;

    #[test]
    fn test_deserialize_keeps_extra_fields() {
        let meta: SeriesMetadata = serde_json::from_str(GDP_JSON).unwrap();
        assert_eq!(meta.id, "GDP");
        assert_eq!(meta.popularity, Some(93));
        assert_eq!(meta.extra.get("realtime_start").unwrap(), "2024-06-01");

        let round: Value = serde_json::to_value(&meta).unwrap();
        assert_eq!(round["realtime_end"], "2024-06-01");
        assert_eq!(round["units_short"], "Bil. of $");
    }

    #[test]
    fn test_file_stem() {
        let meta: SeriesMetadata = serde_json::from_str(GDP_JSON).unwrap();
        let range = DateRange::full();
        assert_eq!(
            meta.file_stem(&range),
            "GDP_Q_FULL_LATEST_Gross_Domestic_Product"
        );
    }

    #[test]
    fn test_frequency_tag_fallbacks() {
        let mut meta = SeriesMetadata::new("X", "x");
        assert_eq!(meta.frequency_tag(), "unknown");
        meta.frequency = Some("Daily, Close".to_string());
        assert_eq!(meta.frequency_tag(), "Daily,Close");
        meta.frequency_short = Some("D".to_string());
        assert_eq!(meta.frequency_tag(), "D");
    }

    #[test]
    fn test_clean_title() {
        let meta = SeriesMetadata::new(
            "CPIAUCSL",
            "Consumer Price Index for All Urban Consumers: All Items in U.S. City Average / Extra",
        );
        let title = meta.clean_title();
        assert_eq!(title.chars().count(), 60);
        assert!(!title.contains(' '));
        assert!(title.starts_with("Consumer_Price_Index"));
    }

    #[test]
    fn test_table_row_matches_headers() {
        let meta: SeriesMetadata = serde_json::from_str(GDP_JSON).unwrap();
        let headers = SeriesMetadata::table_headers(std::slice::from_ref(&meta));
        let row = meta.table_row(&headers);
        assert_eq!(row.len(), headers.len());

        let cell = |name: &str| {
            let pos = headers.iter().position(|h| h == name).unwrap();
            row[pos].as_str()
        };
        assert_eq!(cell("popularity"), "93");
        assert_eq!(cell("units_short"), "Bil. of $");
        assert_eq!(cell("notes"), "BEA Account Code: A191RC");
        assert_eq!(cell("realtime_start"), "2024-06-01");
    }

    #[test]
    fn test_table_headers_union_of_fields() {
        let gdp: SeriesMetadata = serde_json::from_str(GDP_JSON).unwrap();
        let other: SeriesMetadata = serde_json::from_str(
            r#"{"id": "UNRATE", "group_popularity": 95, "realtime_start": "2024-06-01"}"#,
        )
        .unwrap();
        let headers = SeriesMetadata::table_headers(&[gdp, other.clone()]);

        assert_eq!(&headers[..2], ["id", "title"]);
        assert_eq!(
            &headers[MODELLED_COLUMNS.len()..],
            ["realtime_start", "realtime_end", "group_popularity"]
        );

        let row = other.table_row(&headers);
        assert_eq!(row.last().map(String::as_str), Some("95"));
        assert_eq!(row[1], "");
    }

    #[test]
    fn test_category_deserialize() {
        let cat: Category =
            serde_json::from_str(r#"{"id": 32991, "name": "Money, Banking, & Finance", "parent_id": 0}"#)
                .unwrap();
        assert_eq!(cat.id, 32991);
        assert_eq!(cat.parent_id, 0);
    }
}
