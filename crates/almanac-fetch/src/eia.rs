//! EIA Open Data API v2 client with pagination.

use almanac_types::{AlmanacError, DateRange, Record, Result};
use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::{info, warn};

use crate::{ApiKey, FetchError, HttpClient, url::split_url};

/// Maximum rows the EIA API returns per request.
pub const EIA_PAGE_SIZE: u32 = 5000;

/// Query keys that are managed by the pager and stripped from user URLs.
const MANAGED_PARAMS: &[&str] = &["offset", "length", "api_key", "start", "end"];

/// A data request built from an EIA API browser URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EiaRequest {
    base: String,
    params: Vec<(String, String)>,
    range: DateRange,
    page_size: u32,
}

impl EiaRequest {
    /// Parses a full EIA URL, keeping its facets, data columns and sort order.
    ///
    /// Any `offset`, `length`, `api_key`, `start` or `end` in the URL is
    /// dropped; those are controlled by the pager and [`with_range`](Self::with_range).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute.
    pub fn from_url(url: &str) -> std::result::Result<Self, FetchError> {
        let (base, params) = split_url(url)?;
        let params = params
            .into_iter()
            .filter(|(k, _)| !MANAGED_PARAMS.contains(&k.as_str()))
            .collect();
        Ok(Self {
            base,
            params,
            range: DateRange::full(),
            page_size: EIA_PAGE_SIZE,
        })
    }

    /// Restricts the request to a date window.
    #[must_use]
    pub const fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Sets rows per page, clamped to `1..=5000`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, EIA_PAGE_SIZE);
        self
    }

    /// Endpoint URL without query.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The date window applied to the request.
    #[must_use]
    pub const fn range(&self) -> &DateRange {
        &self.range
    }

    /// Rows requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Query parameters for the page starting at `offset`.
    #[must_use]
    pub fn page_query(&self, offset: u64, api_key: &ApiKey) -> Vec<(String, String)> {
        let mut query = self.params.clone();
        query.push(("offset".to_string(), offset.to_string()));
        query.push(("length".to_string(), self.page_size.to_string()));
        query.push(("api_key".to_string(), api_key.expose().to_string()));
        if let Some(start) = self.range.start_param() {
            query.push(("start".to_string(), start));
        }
        if let Some(end) = self.range.end_param() {
            query.push(("end".to_string(), end));
        }
        query
    }
}

/// One page of EIA rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EiaPage {
    /// Offset of the first row in this page.
    pub offset: u64,
    /// Rows in response order.
    pub records: Vec<Record>,
    /// Total rows matching the request, as reported by the API.
    pub total: u64,
}

/// Client for the EIA Open Data API.
#[derive(Debug, Clone)]
pub struct EiaClient {
    http: HttpClient,
    api_key: ApiKey,
}

enum Cursor {
    Next { offset: u64, received: u64 },
    Done,
}

impl EiaClient {
    /// Creates a new client.
    #[must_use]
    pub const fn new(http: HttpClient, api_key: ApiKey) -> Self {
        Self { http, api_key }
    }

    /// Streams every page of a request.
    ///
    /// The stream ends when the API returns no data block, an empty page,
    /// or once the reported total has been received. Consecutive pages are
    /// spaced by the client's request delay.
    pub fn pages<'a>(&'a self, request: &'a EiaRequest) -> impl Stream<Item = Result<EiaPage>> + 'a {
        let start = Cursor::Next {
            offset: 0,
            received: 0,
        };
        stream::try_unfold(start, move |cursor| async move {
            let Cursor::Next { offset, received } = cursor else {
                return Ok::<_, AlmanacError>(None);
            };

            info!(
                from = offset,
                to = offset + u64::from(request.page_size()),
                "Fetching rows"
            );
            let value = self
                .http
                .get_json(request.base(), &request.page_query(offset, &self.api_key))
                .await
                .map_err(AlmanacError::from)?;

            let Some((records, total)) = parse_page(&value) else {
                warn!(
                    error = value.get("error").map(ToString::to_string).unwrap_or_default(),
                    "No valid data in response; stopping"
                );
                return Ok(None);
            };
            if records.is_empty() {
                info!("No more records");
                return Ok(None);
            }

            let received = received + records.len() as u64;
            let total = total.unwrap_or(received);
            info!(received, total, "Rows received");

            let next = if received >= total {
                info!("All data retrieved");
                Cursor::Done
            } else {
                Cursor::Next {
                    offset: offset + records.len() as u64,
                    received,
                }
            };
            Ok(Some((
                EiaPage {
                    offset,
                    records,
                    total,
                },
                next,
            )))
        })
    }
}

/// Extracts `response.data` and `response.total` from a page.
///
/// Returns `None` when the body has no data block.
fn parse_page(value: &Value) -> Option<(Vec<Record>, Option<u64>)> {
    let response = value.get("response")?;
    let data = response.get("data")?.as_array()?;

    let records = data
        .iter()
        .filter_map(|row| row.as_object().cloned().map(Record::new))
        .collect();
    let total = response.get("total").and_then(|t| match t {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    Some((records, total))
}

/// Column names for a CSV export, derived from the first row.
///
/// A `timestamp` column is inserted right after `period` unless the API
/// already returns one.
#[must_use]
pub fn table_headers(first: &Record) -> Vec<String> {
    let mut headers: Vec<String> = first.keys().map(str::to_string).collect();
    if headers.iter().any(|h| h == "timestamp") {
        return headers;
    }
    if let Some(pos) = headers.iter().position(|h| h == "period") {
        headers.insert(pos + 1, "timestamp".to_string());
    }
    headers
}

/// Renders a record in header order, deriving `timestamp` from `period`.
#[must_use]
pub fn table_row(record: &Record, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            if h == "timestamp" && !record.contains("timestamp") {
                record.timestamp()
            } else {
                record.field(h)
            }
        })
        .collect()
}
