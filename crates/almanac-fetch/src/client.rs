//! Retrying JSON client shared by every provider.

use almanac_catalog::Catalog;
use almanac_types::{AlmanacError, ProviderId};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long to wait before retrying a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `step * attempt` (2s, 4s, 6s, ... for a 2s step).
    Linear {
        /// Delay added per attempt.
        step: Duration,
    },
    /// `base * 2^attempt`, capped at `max`.
    Exponential {
        /// Delay multiplied by the power of two.
        base: Duration,
        /// Upper bound for a single wait.
        max: Duration,
    },
    /// The same delay after every failure.
    Fixed(Duration),
}

impl Backoff {
    /// Delay after the given failed attempt (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Linear { step } => step.saturating_mul(attempt),
            Self::Exponential { base, max } => base.saturating_mul(1u32 << attempt.min(16)).min(max),
            Self::Fixed(delay) => delay,
        }
    }
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of attempts per request.
    pub max_retries: u32,
    /// Wait policy between attempts.
    pub backoff: Backoff,
    /// Minimum spacing between consecutive requests.
    pub request_delay: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::fred()
    }
}

impl ClientConfig {
    /// Settings tuned for the FRED API.
    #[must_use]
    pub fn fred() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 5,
            backoff: Backoff::Linear {
                step: Duration::from_secs(2),
            },
            request_delay: catalog_delay(ProviderId::Fred),
            user_agent: format!("almanac/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Settings tuned for the EIA Open Data API.
    #[must_use]
    pub fn eia() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 5,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(1),
                max: Duration::from_secs(60),
            },
            request_delay: catalog_delay(ProviderId::Eia),
            user_agent: format!("almanac/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Settings tuned for the Yahoo Finance chart endpoint.
    #[must_use]
    pub fn yahoo() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff: Backoff::Fixed(Duration::from_secs(2)),
            request_delay: catalog_delay(ProviderId::Yahoo),
            // The chart endpoint rejects agents it does not recognise as browsers.
            user_agent: format!(
                "Mozilla/5.0 (X11; Linux x86_64) almanac/{}",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }

    /// Overrides the spacing between requests.
    #[must_use]
    pub const fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// Request spacing advertised for a provider in the catalog.
fn catalog_delay(id: ProviderId) -> Duration {
    Duration::from_millis(Catalog::global().provider(id).request_delay_ms)
}

/// Errors that can occur while talking to a provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The provider answered with a non-retryable error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Every attempt failed with a retryable error.
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Description of the last failure.
        last: String,
    },

    /// Response body was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Decode(String),

    /// A URL could not be parsed or built.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Required API key is not configured.
    #[error("{var} not set; add it to your .env file")]
    MissingApiKey {
        /// Environment variable that should hold the key.
        var: String,
    },

    /// The `.env` file could not be read.
    #[error("Failed to load {path}: {reason}")]
    EnvFile {
        /// Path of the env file.
        path: String,
        /// Underlying error.
        reason: String,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        // Request URLs carry the API key; keep them out of error messages.
        Self::Http(error.without_url())
    }
}

impl From<FetchError> for AlmanacError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Api { status, message } => Self::Api { status, message },
            FetchError::MissingApiKey { var } => Self::MissingApiKey { var },
            FetchError::Decode(msg) => Self::Parse(msg),
            other => Self::Http(other.to_string()),
        }
    }
}

/// JSON-over-HTTP client with retries and request spacing.
///
/// Cloning is cheap; clones share the connection pool and the spacing clock.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            config,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs a GET request and decodes the body as JSON.
    ///
    /// Rate limiting (429), server errors (5xx) and transport failures are
    /// retried according to the configured [`Backoff`]. Other error statuses
    /// fail immediately with the provider's own error message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails permanently or retries run out.
    pub async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, FetchError> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            self.throttle().await;
            debug!(url, query = %loggable_query(query), attempt, "GET");

            match self.client.get(url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = format!("HTTP {status}");
                        self.wait_before_retry(attempt, attempts, &last_error).await;
                        continue;
                    }

                    let body = match response.bytes().await {
                        Ok(body) => body,
                        Err(e) => {
                            last_error = e.without_url().to_string();
                            self.wait_before_retry(attempt, attempts, &last_error).await;
                            continue;
                        }
                    };

                    if !status.is_success() {
                        return Err(FetchError::Api {
                            status: status.as_u16(),
                            message: error_message(&body).unwrap_or_else(|| {
                                status.canonical_reason().unwrap_or("unknown error").to_string()
                            }),
                        });
                    }

                    return serde_json::from_slice(&body)
                        .map_err(|e| FetchError::Decode(e.to_string()));
                }
                Err(e) if is_retryable_error(&e) => {
                    last_error = e.without_url().to_string();
                    self.wait_before_retry(attempt, attempts, &last_error).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts,
            last: last_error,
        })
    }

    /// Waits until `request_delay` has passed since the previous request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.config.request_delay;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn wait_before_retry(&self, attempt: u32, attempts: u32, reason: &str) {
        if attempt >= attempts {
            return;
        }
        let delay = self.config.backoff.delay(attempt);
        warn!(
            attempt,
            attempts,
            wait_secs = delay.as_secs_f64(),
            "Request failed ({reason}); retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Determines if a transport error is worth retrying.
fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}

/// Renders a query for logging with the API key masked.
fn loggable_query(query: &[(String, String)]) -> String {
    query
        .iter()
        .map(|(k, v)| {
            if k == "api_key" {
                format!("{k}=***")
            } else {
                format!("{k}={v}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Extracts a provider error message from a response body.
///
/// Understands FRED (`error_message`), EIA (`error` as string or object) and
/// Yahoo (`chart.error.description`).
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    if let Some(msg) = value.get("error_message").and_then(Value::as_str) {
        return Some(msg.to_string());
    }
    match value.get("error") {
        Some(Value::String(msg)) => return Some(msg.clone()),
        Some(Value::Object(obj)) => {
            if let Some(msg) = obj.get("message").and_then(Value::as_str) {
                return Some(msg.to_string());
            }
        }
        _ => {}
    }
    value
        .pointer("/chart/error/description")
        .and_then(Value::as_str)
        .map(str::to_string)
}
