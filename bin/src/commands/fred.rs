//! FRED commands: single series download, search and full catalog crawl.

use crate::commands::Options;
use crate::display::{self, Format, spinner, truncate};
use almanac_lib::prelude::*;
use almanac_lib::{DEFAULT_CHECKPOINT_EVERY, write_table};
use anyhow::{Context, Result};
use inquire::Confirm;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

fn client(opts: &Options, config: ClientConfig) -> Result<FredClient> {
    let credentials = opts.credentials()?;
    let key = credentials.require(ProviderId::Fred)?.clone();
    let http = HttpClient::new(config).context("Failed to build HTTP client")?;
    Ok(FredClient::new(http, key))
}

/// Download one series and its metadata.
pub(crate) async fn series(
    opts: &Options,
    series_id: &str,
    start: Option<&str>,
    end: Option<&str>,
    output_dir: &Path,
    format: Format,
) -> Result<()> {
    let range = DateRange::parse(start, end)?;
    let client = client(opts, ClientConfig::fred())?;

    let meta = client.series(series_id).await?;
    if !opts.quiet {
        println!(
            "Found series '{}': {}",
            meta.id,
            meta.title.as_deref().unwrap_or_default()
        );
        println!(
            "  Frequency: {} | Units: {}",
            meta.frequency.as_deref().unwrap_or("unknown"),
            meta.units.as_deref().unwrap_or("unknown")
        );
        if range.is_full() {
            println!("  No date range provided; fetching full available history");
        }
    }

    let observations = client.observations(series_id, &range).await?;
    if observations.is_empty() {
        warn!(series = series_id, %range, "No data points returned; nothing written");
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;
    let stem = meta.file_stem(&range);
    let data_path = output_dir.join(format!("{stem}.{}", format.extension()));
    let meta_path = output_dir.join(format!("{stem}_metadata.json"));

    display::write_observations(&observations, &data_path, format)?;
    display::write_metadata(&meta, &meta_path)?;

    if !opts.quiet {
        let missing = observations.iter().filter(|o| o.is_missing()).count();
        println!(
            "Saved {} observations ({} missing) to {}",
            observations.len(),
            missing,
            data_path.display()
        );
        if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
            println!("  Range:    {} -> {}", first.date, last.date);
        }
        println!("  Metadata: {}", meta_path.display());
    }

    Ok(())
}

/// Search series by keyword, most popular first.
pub(crate) async fn search(
    opts: &Options,
    text: &str,
    limit: u32,
    output: Option<&Path>,
) -> Result<()> {
    let client = client(opts, ClientConfig::fred())?;
    let results = client.search(text, limit).await?;

    if results.is_empty() {
        println!("No series found.");
        return Ok(());
    }

    println!("{:<20} {:<6} {:>5}  {}", "ID", "FREQ", "POP", "TITLE");
    println!("{}", "-".repeat(90));
    for meta in &results {
        println!(
            "{:<20} {:<6} {:>5}  {}",
            meta.id,
            meta.frequency_tag(),
            meta.popularity.map(|p| p.to_string()).unwrap_or_default(),
            truncate(meta.title.as_deref().unwrap_or_default(), 60)
        );
    }
    println!("\nTotal: {} series", results.len());

    if let Some(path) = output {
        save_series_list(path, &results).await?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

/// Crawl the category tree from `root`, saving every series found to `output`.
pub(crate) async fn crawl(
    opts: &Options,
    root: u64,
    output: &Path,
    delay_ms: u64,
    checkpoint: usize,
    yes: bool,
) -> Result<()> {
    let proceed = confirm_crawl(yes, || {
        println!("Crawl plan:");
        println!("  Root category: {root}");
        println!("  Request delay: {delay_ms} ms");
        println!("  Output:        {}", output.display());
        println!("  The full tree has several thousand categories and takes hours.");
        println!();

        Confirm::new("Start crawl?")
            .with_default(false)
            .prompt()
            .context("Confirmation prompt failed")
    })?;
    if !proceed {
        println!("Cancelled.");
        return Ok(());
    }

    let config = ClientConfig::fred().with_request_delay(Duration::from_millis(delay_ms));
    let client = client(opts, config)?;
    let checkpoint = if checkpoint == 0 {
        DEFAULT_CHECKPOINT_EVERY
    } else {
        checkpoint
    };

    let progress = spinner(opts.quiet);
    let mut crawler = Crawler::new(&client, root).with_checkpoint_every(checkpoint);

    while let Some(step) = crawler.step().await {
        progress.set_message(format!(
            "category {} | {} series | {} categories queued",
            step.category_id,
            step.total,
            crawler.pending()
        ));
        if step.checkpoint {
            save_series_list(output, crawler.series()).await?;
            info!(total = step.total, path = %output.display(), "Intermediate save");
        }
    }

    let report = crawler.into_report();
    progress.finish_with_message(format!(
        "Visited {} categories ({} requests failed)",
        report.categories_visited, report.requests_failed
    ));

    let written = save_series_list(output, &report.series).await?;
    if !opts.quiet {
        println!("Saved {written} series to {}", output.display());
    }

    Ok(())
}

/// Asks before a crawl unless `--yes` was given. `--quiet` does not skip it.
fn confirm_crawl(yes: bool, prompt: impl FnOnce() -> Result<bool>) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    prompt()
}

async fn save_series_list(path: &Path, series: &[SeriesMetadata]) -> Result<u64> {
    let headers = SeriesMetadata::table_headers(series);
    let written = write_table(path, &headers, series.iter().map(|s| s.table_row(&headers)))
        .await
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(written)
}
