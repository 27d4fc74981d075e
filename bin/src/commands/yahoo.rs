//! Yahoo Finance download command.

use crate::commands::Options;
use crate::display::{self, Format};
use almanac_lib::prelude::*;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tracing::info;

/// Download price bars for a ticker.
pub(crate) async fn download(
    opts: &Options,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
    interval: &str,
    output_dir: &Path,
    format: Format,
) -> Result<()> {
    let ticker = ticker.trim().to_uppercase();
    let interval: Interval = interval.parse()?;
    let range = DateRange::parse(start, end)?;
    let plan = ChartPlan::new(interval, &range, Utc::now())?;
    if range.is_full() {
        info!(ticker, "Fetching full available history");
    }

    let http = HttpClient::new(ClientConfig::yahoo()).context("Failed to build HTTP client")?;
    let client = YahooClient::new(http);
    let bars = client.chart(&ticker, &plan).await?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;
    let path = output_dir.join(output_file_name(&ticker, interval, format));
    display::write_bars(&bars, &path, format)?;

    if !opts.quiet {
        println!("SUMMARY");
        println!("{}", "-".repeat(40));
        println!("Ticker:     {ticker}");
        println!("Interval:   {interval}");
        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            println!("Start:      {}", first.timestamp.date_naive());
            println!("End:        {}", last.timestamp.date_naive());
        }
        println!("Rows:       {}", bars.len());
        println!("Saved File: {}", path.display());
    }

    Ok(())
}

fn output_file_name(ticker: &str, interval: Interval, format: Format) -> String {
    format!("{ticker}_{interval}_data.{}", format.extension())
}
