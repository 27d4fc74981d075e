//! Info command implementation.
//!
//! Shows provider details (registration, documentation, key status) or the
//! catalog entry of a well-known series.

use crate::commands::Options;
use almanac_lib::{ApiKey, Provider};
use almanac_lib::prelude::*;
use anyhow::{Result, bail};

/// Show details for a provider or a well-known series.
pub(crate) fn show_info(opts: &Options, id: &str) -> Result<()> {
    let catalog = Catalog::global();

    if let Ok(provider_id) = id.parse::<ProviderId>() {
        let credentials = opts.credentials()?;
        show_provider(catalog.provider(provider_id), credentials.key(provider_id));
        return Ok(());
    }

    let Some(series) = catalog.series(id) else {
        bail!(
            "Unknown provider or series: {id}. Providers: eia, fred, yahoo; \
             search FRED with `almanac fred search <TEXT>`"
        );
    };

    println!("Series:    {}", series.id);
    println!("Title:     {}", series.title);
    println!("Frequency: {}", series.frequency);
    println!("Units:     {}", series.units);
    println!("Provider:  {}", catalog.provider(ProviderId::Fred).name);
    println!("\nDownload with: almanac fred series {}", series.id);

    Ok(())
}

fn show_provider(provider: &Provider, key: Option<&ApiKey>) {
    println!("Provider:    {}", provider.name);
    println!("ID:          {}", provider.id);
    println!("Description: {}", provider.description);
    println!("Base URL:    {}", provider.base_url);
    println!("Docs:        {}", provider.docs_url);
    println!("Formats:     {}", provider.formats.join(", "));
    if let Some(page_size) = provider.page_size {
        println!("Page size:   {page_size} rows");
    }
    println!("Delay:       {} ms between requests", provider.request_delay_ms);

    if !provider.requires_key() {
        println!("API key:     not required");
        return;
    }

    if let Some(url) = &provider.registration_url {
        println!("Register:    {url}");
    }
    println!("Key vars:    {}", provider.key_vars.join(", "));
    match key {
        Some(key) => println!("Key status:  configured ({key})"),
        None => println!(
            "Key status:  missing; add {}=... to your .env file",
            provider.key_vars.first().map_or("API_KEY", String::as_str)
        ),
    }

    if !provider.endpoints.is_empty() {
        println!("\nEndpoints:");
        for endpoint in &provider.endpoints {
            println!("  {}", provider.endpoint_url(endpoint));
        }
    }
}
