//! CSV output format.

use almanac_types::{Bar, Observation};
use std::fmt::Display;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

/// Missing values become empty cells.
fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Formatter for CsvFormatter {
    fn write_observations<W: Write + Send>(
        &self,
        observations: &[Observation],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "date{d}value")?;
        }

        for obs in observations {
            writeln!(writer, "{}{d}{}", obs.date.format("%Y-%m-%d"), cell(obs.value))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "timestamp{d}open{d}high{d}low{d}close{d}adj_close{d}volume"
            )?;
        }

        for bar in bars {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                bar.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                cell(bar.open),
                cell(bar.high),
                cell(bar.low),
                cell(bar.close),
                cell(bar.adj_close),
                cell(bar.volume)
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io::Cursor;

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), Some(3.95)),
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), None),
        ]
    }

    fn bar() -> Bar {
        Bar {
            open: Some(472.16),
            high: Some(473.67),
            low: Some(470.49),
            close: Some(472.65),
            adj_close: None,
            volume: Some(123_623_700),
            ..Bar::empty(Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap())
        }
    }

    #[test]
    fn test_csv_observations() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new()
            .write_observations(&observations(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result, "date,value\n2024-01-02,3.95\n2024-01-15,\n");
    }

    #[test]
    fn test_csv_bars() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new().write_bars(&[bar()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines[0], "timestamp,open,high,low,close,adj_close,volume");
        assert_eq!(
            lines[1],
            "2024-01-02T14:30:00Z,472.16,473.67,470.49,472.65,,123623700"
        );
    }

    #[test]
    fn test_csv_no_header() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new()
            .with_header(false)
            .write_observations(&observations(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(!result.contains("date,value"));
        assert_eq!(result.lines().count(), 2);
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let mut output = Cursor::new(Vec::new());
        formatter.write_observations(&observations(), &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with("date\tvalue\n"));
        assert_eq!(formatter.extension(), "tsv");
    }
}
