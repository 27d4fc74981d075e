//! Yahoo Finance chart client.

use almanac_types::{AlmanacError, Bar, DateRange, DateRangeError, Interval, Result};
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    HttpClient,
    url::{YAHOO_CHART_URL, join_segment},
};

/// How far back Yahoo serves intraday bars.
pub const INTRADAY_LOOKBACK_DAYS: i64 = 730;

/// Time window sent to the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Full available history.
    Max,
    /// Explicit window; a missing start means the earliest available bar.
    Window {
        /// Window start.
        start: Option<DateTime<Utc>>,
        /// Window end (exclusive).
        end: DateTime<Utc>,
    },
}

/// A validated chart request window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPlan {
    /// Bar interval.
    pub interval: Interval,
    /// Requested window.
    pub period: Period,
    /// True when the start was moved forward to fit the intraday look-back.
    pub trimmed: bool,
}

impl ChartPlan {
    /// Resolves a user date range into a request window.
    ///
    /// * No dates at all requests the full history.
    /// * The end date is inclusive and never later than `now`.
    /// * Intraday intervals only reach back [`INTRADAY_LOOKBACK_DAYS`]; an
    ///   older start is moved forward.
    ///
    /// # Errors
    ///
    /// Returns an error if the end falls before the start, or if an intraday
    /// window ends before the look-back limit.
    pub fn new(interval: Interval, range: &DateRange, now: DateTime<Utc>) -> std::result::Result<Self, DateRangeError> {
        if range.is_full() {
            return Ok(Self {
                interval,
                period: Period::Max,
                trimmed: false,
            });
        }

        let start = range.start.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end = range
            .end
            .map_or(now, |d| (d + TimeDelta::days(1)).and_time(NaiveTime::MIN).and_utc())
            .min(now);

        match start {
            Some(start) if end < start => {
                return Err(DateRangeError::InvalidRange {
                    start: start.date_naive(),
                    end: end.date_naive(),
                });
            }
            _ => {}
        }

        let mut trimmed = false;
        let start = match start {
            Some(s) if interval.is_intraday() => {
                let earliest = now - TimeDelta::days(INTRADAY_LOOKBACK_DAYS);
                if s < earliest {
                    trimmed = true;
                    Some(earliest)
                } else {
                    Some(s)
                }
            }
            other => other,
        };
        // A window that ends before the look-back limit has nothing left.
        match start {
            Some(start) if end < start => {
                return Err(DateRangeError::InvalidRange {
                    start: start.date_naive(),
                    end: end.date_naive(),
                });
            }
            _ => {}
        }

        Ok(Self {
            interval,
            period: Period::Window { start, end },
            trimmed,
        })
    }

    /// Query parameters for the chart endpoint.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("interval".to_string(), self.interval.as_str().to_string()),
            ("includeAdjustedClose".to_string(), "true".to_string()),
        ];
        match self.period {
            Period::Max => query.push(("range".to_string(), "max".to_string())),
            Period::Window { start, end } => {
                let period1 = start.map_or(0, |s| s.timestamp());
                query.push(("period1".to_string(), period1.to_string()));
                query.push(("period2".to_string(), end.timestamp().to_string()));
            }
        }
        query
    }
}

/// Client for the Yahoo Finance chart endpoint. No API key is needed.
#[derive(Debug, Clone)]
pub struct YahooClient {
    http: HttpClient,
    base_url: String,
}

impl YahooClient {
    /// Creates a client for the public chart endpoint.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: YAHOO_CHART_URL.to_string(),
        }
    }

    /// Points the client at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Downloads price bars for a ticker.
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::InvalidTicker`] for a blank ticker and
    /// [`AlmanacError::NoData`] when the response holds no bars.
    pub async fn chart(&self, ticker: &str, plan: &ChartPlan) -> Result<Vec<Bar>> {
        let ticker = ticker.trim();
        if ticker.is_empty() || ticker.chars().any(char::is_whitespace) {
            return Err(AlmanacError::InvalidTicker(ticker.to_string()));
        }
        if plan.trimmed {
            warn!(
                days = INTRADAY_LOOKBACK_DAYS,
                "Range too long for intraday data; trimming to the look-back window"
            );
        }

        let url = join_segment(&self.base_url, ticker)?;
        info!(ticker, interval = %plan.interval, "Fetching chart");
        let value = self.http.get_json(&url, &plan.query()).await?;
        let bars = parse_chart(ticker, value)?;
        if bars.is_empty() {
            return Err(AlmanacError::NoData {
                subject: ticker.to_string(),
            });
        }
        Ok(bars)
    }
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn parse_chart(ticker: &str, value: Value) -> Result<Vec<Bar>> {
    let envelope: ChartEnvelope = serde_json::from_value(value)?;
    if let Some(error) = envelope.chart.error.filter(|e| !e.is_null()) {
        let message = error
            .get("description")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_string);
        return Err(AlmanacError::Api {
            status: 200,
            message,
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(AlmanacError::NoData {
            subject: ticker.to_string(),
        });
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();
    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = DateTime::from_timestamp(ts, 0)?;
            let bar = Bar {
                timestamp,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                adj_close: at(&adj, i),
                volume: at(&quote.volume, i).map(|v| v.max(0.0) as u64),
            };
            (!bar.is_blank()).then_some(bar)
        })
        .collect();
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_full_history() {
        let plan = ChartPlan::new(Interval::Minute1, &DateRange::full(), now()).unwrap();
        assert_eq!(plan.period, Period::Max);
        assert!(plan.query().contains(&("range".to_string(), "max".to_string())));
    }

    #[test]
    fn test_plan_trims_intraday() {
        let range = DateRange::parse(Some("2020-01-01"), None).unwrap();
        let plan = ChartPlan::new(Interval::Minute5, &range, now()).unwrap();
        assert!(plan.trimmed);
        let Period::Window { start, end } = plan.period else {
            panic!("expected window");
        };
        assert_eq!(start, Some(now() - TimeDelta::days(INTRADAY_LOOKBACK_DAYS)));
        assert_eq!(end, now());
    }

    #[test]
    fn test_plan_intraday_window_entirely_too_old() {
        let range = DateRange::parse(Some("2020-01-01"), Some("2021-01-01")).unwrap();
        let err = ChartPlan::new(Interval::Minute1, &range, now()).unwrap_err();
        assert!(matches!(
            err,
            DateRangeError::InvalidRange { end, .. } if end == NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()
        ));

        // Daily bars have no look-back limit
        assert!(ChartPlan::new(Interval::Day1, &range, now()).is_ok());
    }

    #[test]
    fn test_plan_daily_not_trimmed() {
        let range = DateRange::parse(Some("1993-01-29"), Some("2000-12-31")).unwrap();
        let plan = ChartPlan::new(Interval::Day1, &range, now()).unwrap();
        assert!(!plan.trimmed);
        let Period::Window { start, end } = plan.period else {
            panic!("expected window");
        };
        assert_eq!(start.unwrap().date_naive(), NaiveDate::from_ymd_opt(1993, 1, 29).unwrap());
        // End date is inclusive
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
    }

    #[test]
    fn test_plan_clamps_future_end() {
        let range = DateRange::parse(Some("2025-06-01"), Some("2030-01-01")).unwrap();
        let plan = ChartPlan::new(Interval::Hour1, &range, now()).unwrap();
        let Period::Window { end, .. } = plan.period else {
            panic!("expected window");
        };
        assert_eq!(end, now());
    }

    #[test]
    fn test_plan_end_only_starts_at_epoch() {
        let range = DateRange::parse(None, Some("2024-01-01")).unwrap();
        let plan = ChartPlan::new(Interval::Day1, &range, now()).unwrap();
        let query = plan.query();
        assert!(query.contains(&("period1".to_string(), "0".to_string())));
    }

    #[test]
    fn test_plan_start_in_future_is_invalid() {
        let range = DateRange::parse(Some("2026-01-01"), None).unwrap();
        assert!(ChartPlan::new(Interval::Day1, &range, now()).is_err());
    }

    #[test]
    fn test_parse_chart() {
        let value = json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "SPY", "currency": "USD"},
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {
                        "quote": [{
                            "open": [472.16, null, 468.3],
                            "high": [473.67, null, 470.96],
                            "low": [470.49, null, 467.05],
                            "close": [472.65, null, 467.28],
                            "volume": [123623700, null, 103585900]
                        }],
                        "adjclose": [{"adjclose": [465.9, null, 460.6]}]
                    }
                }],
                "error": null
            }
        });
        let bars = parse_chart("SPY", value).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, Some(472.65));
        assert_eq!(bars[0].adj_close, Some(465.9));
        assert_eq!(bars[0].volume, Some(123_623_700));
        assert_eq!(
            bars[1].timestamp,
            Utc.timestamp_opt(1704378600, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_chart_error() {
        let value = json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}
        });
        let err = parse_chart("NOPE", value).unwrap_err();
        assert!(matches!(err, AlmanacError::Api { ref message, .. } if message.contains("delisted")));
    }

    #[test]
    fn test_parse_chart_empty() {
        let value = json!({
            "chart": {"result": [{"timestamp": [], "indicators": {"quote": [{}]}}], "error": null}
        });
        assert!(parse_chart("SPY", value).unwrap().is_empty());

        let value = json!({"chart": {"result": [], "error": null}});
        assert!(matches!(
            parse_chart("SPY", value),
            Err(AlmanacError::NoData { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_ticker_rejected() {
        let client = YahooClient::new(HttpClient::new(crate::ClientConfig::yahoo()).unwrap());
        let plan = ChartPlan::new(Interval::Day1, &DateRange::full(), now()).unwrap();
        assert!(matches!(
            client.chart("  ", &plan).await,
            Err(AlmanacError::InvalidTicker(_))
        ));
    }
}
