//! Display utilities and output formatting for the almanac CLI.

use almanac_lib::prelude::*;
use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Output format for downloaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

fn create(output: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(output).with_context(|| format!("Cannot create {}", output.display()))?;
    Ok(BufWriter::new(file))
}

/// Write observations to a file in the specified format.
pub(crate) fn write_observations(
    observations: &[Observation],
    output: &Path,
    format: Format,
) -> Result<()> {
    let writer = create(output)?;

    match format {
        Format::Csv => CsvFormatter::new().write_observations(observations, writer)?,
        Format::Json => JsonFormatter::new().write_observations(observations, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_observations(observations, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_observations(observations, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                drop(writer);
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Write price bars to a file in the specified format.
pub(crate) fn write_bars(bars: &[Bar], output: &Path, format: Format) -> Result<()> {
    let writer = create(output)?;

    match format {
        Format::Csv => CsvFormatter::new().write_bars(bars, writer)?,
        Format::Json => JsonFormatter::new().write_bars(bars, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_bars(bars, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_bars(bars, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                drop(writer);
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Write series metadata as pretty JSON.
pub(crate) fn write_metadata(meta: &SeriesMetadata, output: &Path) -> Result<()> {
    almanac_lib::write_metadata(meta, create(output)?)?;
    Ok(())
}

/// Spinner for work of unknown length.
pub(crate) fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

/// Progress bar counting rows against a total learned from the first page.
pub(crate) fn row_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb
}

/// Shortens text to `width` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("GDP", 10), "GDP");
        assert_eq!(truncate("Gross Domestic Product", 10), "Gross D...");
    }

    #[test]
    fn test_write_observations_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.csv");
        let obs = vec![Observation::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Some(1.5),
        )];

        write_observations(&obs, &path, Format::Csv).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date,value\n2024-01-01,1.5\n"
        );
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(Format::Ndjson.to_string(), "ndjson");
        assert_eq!(Format::Parquet.extension(), "parquet");
    }
}
