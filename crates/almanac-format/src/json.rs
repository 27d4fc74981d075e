//! JSON output format.

use almanac_types::{Bar, Observation, SeriesMetadata};
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_items<T: Serialize, W: Write>(&self, items: &[T], mut writer: W) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, items)?;
                } else {
                    serde_json::to_writer(&mut writer, items)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for item in items {
                    serde_json::to_writer(&mut writer, item)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_observations<W: Write + Send>(
        &self,
        observations: &[Observation],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_items(observations, writer)
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        self.write_items(bars, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

/// Writes series metadata as pretty-printed JSON, keeping every field FRED sent.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_metadata<W: Write>(meta: &SeriesMetadata, mut writer: W) -> Result<(), FormatError> {
    serde_json::to_writer_pretty(&mut writer, meta)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), Some(3.95)),
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), None),
        ]
    }

    #[test]
    fn test_json_array() {
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new()
            .write_observations(&observations(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains(r#"{"date":"2024-01-02","value":3.95}"#));
        assert!(result.contains(r#""value":null"#));
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());
        formatter.write_observations(&observations(), &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new()
            .with_pretty(true)
            .write_observations(&observations(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("  "));
    }

    #[test]
    fn test_write_metadata_keeps_extra_fields() {
        let meta: SeriesMetadata = serde_json::from_value(serde_json::json!({
            "id": "GDP",
            "title": "Gross Domestic Product",
            "realtime_start": "2024-06-01"
        }))
        .unwrap();

        let mut output = Cursor::new(Vec::new());
        write_metadata(&meta, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains(r#""realtime_start": "2024-06-01""#));
        assert!(result.contains(r#""id": "GDP""#));
    }
}
