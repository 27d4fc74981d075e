//! Provider base URLs and URL helpers.

use url::Url;

use crate::FetchError;

/// Base URL for the FRED API.
pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Base URL for the EIA Open Data API v2.
pub const EIA_BASE_URL: &str = "https://api.eia.gov/v2";

/// Base URL for the Yahoo Finance chart endpoint.
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Splits a URL into its endpoint (no query, no fragment) and ordered query pairs.
///
/// Repeated keys such as `facets[stateid][]` are kept in order.
///
/// # Example
///
/// ```
/// use almanac_fetch::url::split_url;
///
/// let (base, params) = split_url(
///     "https://api.eia.gov/v2/electricity/retail-sales/data/?frequency=monthly&data[0]=price",
/// )
/// .unwrap();
/// assert_eq!(base, "https://api.eia.gov/v2/electricity/retail-sales/data/");
/// assert_eq!(params[0], ("frequency".to_string(), "monthly".to_string()));
/// assert_eq!(params[1], ("data[0]".to_string(), "price".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the input is not an absolute URL.
pub fn split_url(input: &str) -> Result<(String, Vec<(String, String)>), FetchError> {
    let mut parsed = Url::parse(input.trim()).map_err(|e| FetchError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl {
            url: input.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }

    let params = parsed.query_pairs().into_owned().collect();
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok((parsed.to_string(), params))
}

/// Appends one percent-encoded path segment to a base URL.
///
/// # Errors
///
/// Returns an error if the base is not a valid hierarchical URL.
pub fn join_segment(base: &str, segment: &str) -> Result<String, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("not a hierarchical URL".to_string()))?
        .pop_if_empty()
        .push(segment);
    Ok(url.to_string())
}
