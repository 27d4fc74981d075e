//! List command implementation.
//!
//! This module lists the supported providers and the well-known FRED series.

use crate::display::truncate;
use almanac_lib::prelude::*;
use anyhow::Result;

/// List providers and well-known series, optionally filtered by a search pattern.
pub(crate) fn list(search: Option<&str>) -> Result<()> {
    let catalog = Catalog::global();

    if search.is_none() {
        println!("{:<8} {:<20} {:<16} {}", "ID", "NAME", "API KEY", "BASE URL");
        println!("{}", "-".repeat(80));
        for provider in catalog.providers() {
            println!(
                "{:<8} {:<20} {:<16} {}",
                provider.id.as_str(),
                provider.name,
                provider.key_vars.first().map_or("-", String::as_str),
                provider.base_url
            );
        }
        println!();
    }

    let series = match search {
        Some(pattern) => catalog.search(pattern),
        None => catalog.all_series(),
    };

    if series.is_empty() {
        println!("No series found.");
        return Ok(());
    }

    println!("{:<12} {:<10} {}", "SERIES", "FREQUENCY", "TITLE");
    println!("{}", "-".repeat(80));
    for s in &series {
        println!("{:<12} {:<10} {}", s.id, s.frequency, truncate(&s.title, 56));
    }

    println!("\nTotal: {} series", series.len());
    Ok(())
}
