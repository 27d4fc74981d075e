//! Provider and well-known series catalog for the almanac downloader.
//!
//! The catalog answers offline questions: where a provider's API lives, how
//! to register for a key, which environment variable holds it, and what a few
//! commonly used FRED series are.
//!
//! # Example
//!
//! ```
//! use almanac_catalog::Catalog;
//! use almanac_types::ProviderId;
//!
//! let catalog = Catalog::global();
//! let fred = catalog.provider(ProviderId::Fred);
//! assert_eq!(fred.base_url, "https://api.stlouisfed.org/fred/");
//!
//! if let Some(series) = catalog.series("dgs10") {
//!     println!("{}: {}", series.id, series.title);
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/almanac-data/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use almanac_types::ProviderId;
use serde::{Deserialize, Serialize};

/// Provider descriptions embedded at compile time.
const PROVIDERS_JSON: &str = include_str!("../data/providers.json");

/// Well-known FRED series embedded at compile time.
const SERIES_JSON: &str = include_str!("../data/series.json");

/// Global catalog instance.
static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Description of an open-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider identifier.
    pub id: ProviderId,
    /// Display name.
    pub name: String,
    /// What the provider publishes.
    pub description: String,
    /// API base URL.
    pub base_url: String,
    /// Environment variables checked for the API key, in priority order.
    pub key_vars: Vec<String>,
    /// Where to register for an API key.
    pub registration_url: Option<String>,
    /// API documentation.
    pub docs_url: String,
    /// Endpoint paths relative to the base URL.
    pub endpoints: Vec<String>,
    /// Response formats the provider offers.
    pub formats: Vec<String>,
    /// Recommended pause between consecutive requests.
    pub request_delay_ms: u64,
    /// Maximum rows per request, when the API paginates.
    pub page_size: Option<u32>,
}

impl Provider {
    /// Returns true if the provider requires an API key.
    #[must_use]
    pub fn requires_key(&self) -> bool {
        !self.key_vars.is_empty()
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

/// A commonly used FRED series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSeries {
    /// FRED series identifier.
    pub id: String,
    /// Series title.
    pub title: String,
    /// Native frequency.
    pub frequency: String,
    /// Units of measure.
    pub units: String,
}

/// Registry of providers and well-known series.
#[derive(Debug)]
pub struct Catalog {
    providers: BTreeMap<ProviderId, Provider>,
    series: HashMap<String, KnownSeries>,
}

impl Catalog {
    /// Returns the global catalog.
    ///
    /// The catalog is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        CATALOG.get_or_init(Self::load)
    }

    /// Loads the catalog from the embedded JSON data.
    fn load() -> Self {
        let providers: Vec<Provider> =
            serde_json::from_str(PROVIDERS_JSON).expect("Invalid providers.json");
        let series: Vec<KnownSeries> =
            serde_json::from_str(SERIES_JSON).expect("Invalid series.json");

        Self {
            providers: providers.into_iter().map(|p| (p.id, p)).collect(),
            series: series
                .into_iter()
                .map(|s| (s.id.to_uppercase(), s))
                .collect(),
        }
    }

    /// Returns the description of a provider.
    ///
    /// Every [`ProviderId`] has an entry; this is checked by the test suite.
    #[must_use]
    pub fn provider(&self, id: ProviderId) -> &Provider {
        &self.providers[&id]
    }

    /// Returns all providers in identifier order.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Looks up a well-known series by ID (case-insensitive).
    #[must_use]
    pub fn series(&self, id: &str) -> Option<&KnownSeries> {
        self.series.get(&id.to_uppercase())
    }

    /// Returns all well-known series sorted by ID.
    pub fn all_series(&self) -> Vec<&KnownSeries> {
        let mut all: Vec<_> = self.series.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Searches well-known series by ID or title (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&KnownSeries> {
        let pattern = pattern.to_lowercase();
        self.all_series()
            .into_iter()
            .filter(|s| {
                s.id.to_lowercase().contains(&pattern) || s.title.to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns all well-known series IDs sorted alphabetically.
    pub fn series_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.series.values().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
