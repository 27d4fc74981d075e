//! EIA download command.
//!
//! Streams every page of an EIA v2 data request into a CSV file.

use crate::commands::Options;
use crate::display::row_bar;
use almanac_lib::prelude::*;
use almanac_lib::{table_headers, table_row};
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Download all rows matching an EIA API URL.
pub(crate) async fn download(
    opts: &Options,
    url: &str,
    start: Option<&str>,
    end: Option<&str>,
    output: &Path,
    page_size: u32,
    delay_ms: u64,
) -> Result<()> {
    let range = DateRange::parse(start, end)?;
    let request = EiaRequest::from_url(url)?
        .with_range(range)
        .with_page_size(page_size);

    let credentials = opts.credentials()?;
    let key = credentials.require(ProviderId::Eia)?.clone();
    let config = ClientConfig::eia().with_request_delay(Duration::from_millis(delay_ms));
    let http = HttpClient::new(config).context("Failed to build HTTP client")?;
    let client = EiaClient::new(http, key);

    let progress = row_bar(opts.quiet);
    progress.set_message(request.base().to_string());

    let mut table: Option<TableWriter> = None;
    let mut pages = std::pin::pin!(client.pages(&request));

    while let Some(page) = pages.next().await {
        let page = page?;
        progress.set_length(page.total);

        let Some(first) = page.records.first() else {
            continue;
        };
        if table.is_none() {
            let mut writer = TableWriter::create(output)
                .await
                .with_context(|| format!("Cannot create {}", output.display()))?;
            writer.write_header(&table_headers(first)).await?;
            table = Some(writer);
        }
        let Some(writer) = table.as_mut() else {
            continue;
        };

        let headers = writer.headers().map(<[String]>::to_vec).unwrap_or_default();
        for record in &page.records {
            writer.write_row(table_row(record, &headers)).await?;
        }
        writer.flush().await?;
        progress.inc(page.records.len() as u64);
    }

    let Some(writer) = table else {
        progress.abandon_with_message("No data returned");
        warn!(url = request.base(), "EIA returned no rows; nothing written");
        return Ok(());
    };

    let rows = writer.finish().await?;
    progress.finish_with_message(format!("Downloaded {rows} rows"));
    if !opts.quiet {
        println!("Saved {rows} rows to {}", output.display());
    }

    Ok(())
}
