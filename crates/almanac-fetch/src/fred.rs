//! FRED API client.

use almanac_types::{AlmanacError, Category, DateRange, Observation, Result, SeriesMetadata};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{ApiKey, HttpClient, url::FRED_BASE_URL};

/// Maximum page size FRED accepts for list endpoints.
pub const FRED_PAGE_LIMIT: u32 = 1000;

/// Client for the FRED API.
#[derive(Debug, Clone)]
pub struct FredClient {
    http: HttpClient,
    api_key: ApiKey,
    base_url: String,
}

impl FredClient {
    /// Creates a client for the public FRED endpoint.
    #[must_use]
    pub fn new(http: HttpClient, api_key: ApiKey) -> Self {
        Self {
            http,
            api_key,
            base_url: FRED_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut query: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        query.push(("api_key".to_string(), self.api_key.expose().to_string()));
        query.push(("file_type".to_string(), "json".to_string()));

        let url = format!("{}/{}", self.base_url, endpoint);
        Ok(self.http.get_json(&url, &query).await?)
    }

    /// Fetches metadata (frequency, units, ...) for a series.
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::UnknownSeries`] if FRED does not know the ID.
    pub async fn series(&self, series_id: &str) -> Result<SeriesMetadata> {
        let value = match self.request("series", &[("series_id", series_id.to_string())]).await {
            Ok(value) => value,
            Err(AlmanacError::Api { status: 400, .. }) => {
                return Err(AlmanacError::UnknownSeries(series_id.to_string()));
            }
            Err(e) => return Err(e),
        };
        let meta = parse_series(series_id, value)?;
        info!(
            series = %meta.id,
            title = meta.title.as_deref().unwrap_or_default(),
            frequency = meta.frequency.as_deref().unwrap_or_default(),
            units = meta.units.as_deref().unwrap_or_default(),
            "Found series"
        );
        Ok(meta)
    }

    /// Fetches observations for a series, optionally bounded by `range`.
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::NoData`] if the response has no observation list.
    pub async fn observations(&self, series_id: &str, range: &DateRange) -> Result<Vec<Observation>> {
        let mut params = vec![("series_id", series_id.to_string())];
        if let Some(start) = range.start_param() {
            params.push(("observation_start", start));
        }
        if let Some(end) = range.end_param() {
            params.push(("observation_end", end));
        }
        if range.is_full() {
            debug!(series = series_id, "No date range provided; fetching full history");
        }

        let value = self.request("series/observations", &params).await?;
        let observations = parse_observations(series_id, value)?;
        info!(series = series_id, count = observations.len(), "Retrieved observations");
        Ok(observations)
    }

    /// Full-text search over series titles and notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(&self, text: &str, limit: u32) -> Result<Vec<SeriesMetadata>> {
        let value = self
            .request(
                "series/search",
                &[
                    ("search_text", text.to_string()),
                    ("limit", limit.clamp(1, FRED_PAGE_LIMIT).to_string()),
                    ("order_by", "popularity".to_string()),
                    ("sort_order", "desc".to_string()),
                ],
            )
            .await?;
        Ok(parse_series_list(value)?.0)
    }

    /// Lists the direct children of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn category_children(&self, category_id: u64) -> Result<Vec<Category>> {
        let value = self
            .request("category/children", &[("category_id", category_id.to_string())])
            .await?;
        parse_categories(value)
    }

    /// Lists every series attached to a category, following pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn category_series(&self, category_id: u64) -> Result<Vec<SeriesMetadata>> {
        let mut all = Vec::new();
        loop {
            let value = self
                .request(
                    "category/series",
                    &[
                        ("category_id", category_id.to_string()),
                        ("limit", FRED_PAGE_LIMIT.to_string()),
                        ("offset", all.len().to_string()),
                    ],
                )
                .await?;
            let (page, count) = parse_series_list(value)?;
            let received = page.len();
            all.extend(page);

            let total = count.map_or(all.len(), |c| c as usize);
            if received == 0 || all.len() >= total {
                break;
            }
            debug!(category_id, fetched = all.len(), total, "Fetching next page");
        }
        Ok(all)
    }
}

#[async_trait]
impl crate::CategorySource for FredClient {
    async fn category_series(&self, category_id: u64) -> Result<Vec<SeriesMetadata>> {
        Self::category_series(self, category_id).await
    }

    async fn category_children(&self, category_id: u64) -> Result<Vec<Category>> {
        Self::category_children(self, category_id).await
    }
}

#[derive(Deserialize)]
struct SeriesList {
    #[serde(default)]
    seriess: Option<Vec<SeriesMetadata>>,
    #[serde(default)]
    count: Option<u64>,
}

#[derive(Deserialize)]
struct ObservationList {
    #[serde(default)]
    observations: Option<Vec<RawObservation>>,
}

#[derive(Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Deserialize)]
struct CategoryList {
    #[serde(default)]
    categories: Vec<Category>,
}

fn parse_series(series_id: &str, value: Value) -> Result<SeriesMetadata> {
    let list: SeriesList = serde_json::from_value(value)?;
    list.seriess
        .and_then(|s| s.into_iter().next())
        .ok_or_else(|| AlmanacError::UnknownSeries(series_id.to_string()))
}

fn parse_series_list(value: Value) -> Result<(Vec<SeriesMetadata>, Option<u64>)> {
    let list: SeriesList = serde_json::from_value(value)?;
    Ok((list.seriess.unwrap_or_default(), list.count))
}

fn parse_observations(series_id: &str, value: Value) -> Result<Vec<Observation>> {
    let list: ObservationList = serde_json::from_value(value)?;
    let raw = list.observations.ok_or_else(|| AlmanacError::NoData {
        subject: series_id.to_string(),
    })?;

    raw.into_iter()
        .map(|obs| {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| AlmanacError::Parse(format!("observation date '{}': {e}", obs.date)))?;
            Ok(Observation::new(date, Observation::parse_value(&obs.value)))
        })
        .collect()
}

fn parse_categories(value: Value) -> Result<Vec<Category>> {
    let list: CategoryList = serde_json::from_value(value)?;
    Ok(list.categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use crate::testing::{MockServer, fast_config, reply};
    use serde_json::json;

    fn client_for(server: &MockServer) -> FredClient {
        let http = HttpClient::new(fast_config()).unwrap();
        FredClient::new(http, ApiKey::new("k").unwrap()).with_base_url(server.url("/fred"))
    }

    #[test]
    fn test_parse_series() {
        let value = json!({
            "realtime_start": "2024-06-01",
            "seriess": [{
                "id": "DGS10",
                "title": "Market Yield on U.S. Treasury Securities at 10-Year Constant Maturity",
                "frequency": "Daily",
                "frequency_short": "D",
                "units": "Percent"
            }]
        });
        let meta = parse_series("DGS10", value).unwrap();
        assert_eq!(meta.id, "DGS10");
        assert_eq!(meta.frequency_tag(), "D");
    }

    #[test]
    fn test_parse_series_missing() {
        let err = parse_series("NOPE", json!({"seriess": []})).unwrap_err();
        assert!(matches!(err, AlmanacError::UnknownSeries(ref id) if id == "NOPE"));

        let err = parse_series("NOPE", json!({})).unwrap_err();
        assert!(matches!(err, AlmanacError::UnknownSeries(_)));
    }

    #[test]
    fn test_parse_observations() {
        let value = json!({
            "count": 3,
            "observations": [
                {"realtime_start": "2024-06-01", "realtime_end": "2024-06-01", "date": "2024-01-02", "value": "3.95"},
                {"realtime_start": "2024-06-01", "realtime_end": "2024-06-01", "date": "2024-01-15", "value": "."},
                {"realtime_start": "2024-06-01", "realtime_end": "2024-06-01", "date": "2024-01-16", "value": "4.07"}
            ]
        });
        let obs = parse_observations("DGS10", value).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(obs[0].value, Some(3.95));
        assert!(obs[1].is_missing());
    }

    #[test]
    fn test_parse_observations_empty_vs_missing() {
        assert!(parse_observations("X", json!({"observations": []})).unwrap().is_empty());
        assert!(matches!(
            parse_observations("X", json!({"error": "nope"})),
            Err(AlmanacError::NoData { .. })
        ));
    }

    #[test]
    fn test_parse_observations_bad_date() {
        let value = json!({"observations": [{"date": "01/02/2024", "value": "1"}]});
        assert!(matches!(
            parse_observations("X", value),
            Err(AlmanacError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_series_list_with_count() {
        let value = json!({
            "count": 2500,
            "offset": 0,
            "limit": 1000,
            "seriess": [{"id": "A"}, {"id": "B"}]
        });
        let (list, count) = parse_series_list(value).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(count, Some(2500));
    }

    #[test]
    fn test_parse_categories() {
        let value = json!({
            "categories": [
                {"id": 32991, "name": "Money, Banking, & Finance", "parent_id": 0},
                {"id": 10, "name": "Population, Employment, & Labor Markets", "parent_id": 0}
            ]
        });
        let cats = parse_categories(value).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[1].id, 10);
        assert!(parse_categories(json!({})).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_base_url_trims_slash() {
        let http = HttpClient::new(ClientConfig::fred()).unwrap();
        let key = ApiKey::new("k").unwrap();
        let client = FredClient::new(http, key).with_base_url("http://localhost:9/fred/");
        assert_eq!(client.base_url, "http://localhost:9/fred");
    }

    #[tokio::test]
    async fn test_category_series_follows_pagination() {
        let server = MockServer::start(vec![
            reply(200, json!({"count": 3, "offset": 0, "limit": 1000, "seriess": [{"id": "A"}, {"id": "B"}]})),
            reply(200, json!({"count": 3, "offset": 2, "limit": 1000, "seriess": [{"id": "C"}]})),
        ])
        .await;

        let series = client_for(&server).category_series(32991).await.unwrap();
        let ids: Vec<_> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(server.param("offset"), vec!["0", "2"]);
        assert_eq!(server.param("category_id"), vec!["32991", "32991"]);
        assert!(server.requests()[0].starts_with("/fred/category/series?"));
    }

    #[tokio::test]
    async fn test_category_series_stops_on_short_count() {
        let server = MockServer::start(vec![
            reply(200, json!({"seriess": [{"id": "A"}]})),
            reply(200, json!({"seriess": [{"id": "B"}]})),
        ])
        .await;

        let series = client_for(&server).category_series(1).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_series_bad_request_is_unknown_series() {
        let server = MockServer::start(vec![reply(
            400,
            json!({"error_code": 400, "error_message": "Bad Request.  The series does not exist."}),
        )])
        .await;

        let err = client_for(&server).series("NOPE").await.unwrap_err();
        assert!(matches!(err, AlmanacError::UnknownSeries(ref id) if id == "NOPE"));
        assert_eq!(server.requests().len(), 1);
        assert_eq!(server.param("file_type"), vec!["json"]);
    }
}
