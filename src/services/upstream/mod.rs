/// Upstream catalog access
///
/// Every call to the movie metadata API goes through [`UpstreamClient::fetch`],
/// which owns the API key injection, the retry budget and the classification of
/// failures. The raw HTTP exchange sits behind [`UpstreamTransport`] so the
/// policy can be exercised without a network.
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::{
    config::Config,
    models::{records_from_listing, MovieRecord},
};

pub mod http;

pub use http::HttpTransport;

/// TMDB v3 endpoint paths
pub mod endpoints {
    pub const GENRE_LIST: &str = "/genre/movie/list";
    pub const DISCOVER_MOVIE: &str = "/discover/movie";
    pub const TRENDING_WEEK: &str = "/trending/movie/week";
    pub const SEARCH_MOVIE: &str = "/search/movie";
    pub const SEARCH_KEYWORD: &str = "/search/keyword";

    pub fn movie(id: i64) -> String {
        format!("/movie/{}", id)
    }

    pub fn movie_keywords(id: i64) -> String {
        format!("/movie/{}/keywords", id)
    }

    pub fn movie_recommendations(id: i64) -> String {
        format!("/movie/{}/recommendations", id)
    }
}

/// Failure of a single upstream exchange
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection, timeout or other transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Upstream answered 2xx with a body that is not JSON
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Outcome of a logical upstream request once the retry policy has run
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("upstream resource not found")]
    NotFound,

    #[error("upstream unavailable after {attempts} attempts")]
    ServiceUnavailable { attempts: u32 },

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// Query string parameters for an upstream request, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

/// One raw GET against the upstream API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Sends `GET {base}{endpoint}?{params}` and decodes the JSON body
    async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<Value, TransportError>;
}

/// Attempt budget and exponential backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
            backoff_unit: config.backoff_unit(),
        }
    }

    /// Wait after failed attempt `attempt` (1-based): `unit * base^attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(self.backoff_base.saturating_pow(attempt))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: 2,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Shared entry point for every upstream call
#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<dyn UpstreamTransport>,
    api_key: String,
    policy: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(transport: Arc<dyn UpstreamTransport>, api_key: String, policy: RetryPolicy) -> Self {
        Self {
            transport,
            api_key,
            policy,
        }
    }

    /// Builds a client over the real HTTP transport
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(config.tmdb_api_url.clone(), config.request_timeout())?;
        Ok(Self::new(
            Arc::new(transport),
            config.tmdb_api_key.clone(),
            RetryPolicy::from_config(config),
        ))
    }

    /// Fetches a JSON document, retrying transient failures
    ///
    /// A 404 fails at once with [`UpstreamError::NotFound`]. Network errors
    /// and any other non-2xx status are retried with exponential backoff until
    /// the attempt budget runs out, which yields
    /// [`UpstreamError::ServiceUnavailable`].
    pub async fn fetch(&self, endpoint: &str, params: QueryParams) -> Result<Value, UpstreamError> {
        let params = params.with("api_key", &self.api_key);
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            match self.transport.get(endpoint, &params).await {
                Ok(document) => {
                    tracing::debug!(endpoint = %endpoint, attempt, "Upstream request succeeded");
                    return Ok(document);
                }
                Err(TransportError::Status(404)) => {
                    tracing::debug!(endpoint = %endpoint, "Upstream resource not found");
                    return Err(UpstreamError::NotFound);
                }
                Err(TransportError::Malformed(msg)) => {
                    tracing::error!(endpoint = %endpoint, error = %msg, "Malformed upstream response");
                    return Err(UpstreamError::Malformed(msg));
                }
                Err(err) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "Upstream request failed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.delay(attempt)).await;
                    }
                }
            }
        }

        tracing::error!(endpoint = %endpoint, attempts, "Upstream retry budget exhausted");
        Err(UpstreamError::ServiceUnavailable { attempts })
    }

    /// Fetches a listing endpoint and returns its `results` records
    pub async fn fetch_results(
        &self,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<Vec<MovieRecord>, UpstreamError> {
        let document = self.fetch(endpoint, params).await?;
        Ok(records_from_listing(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::Instant;

    fn client(mock: MockUpstreamTransport) -> UpstreamClient {
        UpstreamClient::new(Arc::new(mock), "test_key".to_string(), RetryPolicy::default())
    }

    #[test]
    fn test_retry_delays_grow_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_query_params_lookup() {
        let params = QueryParams::new()
            .with("page", 2)
            .with_opt("with_keywords", None::<String>)
            .with_opt("sort_by", Some("popularity.desc"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("with_keywords"), None);
        assert_eq!(params.get("sort_by"), Some("popularity.desc"));
        assert_eq!(params.as_slice().len(), 2);
    }

    #[tokio::test]
    async fn test_injects_api_key() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .withf(|endpoint: &str, params: &QueryParams| {
                endpoint == "/genre/movie/list"
                    && params.get("api_key") == Some("test_key")
                    && params.get("language") == Some("en")
            })
            .times(1)
            .returning(|_, _| Ok(json!({"genres": []})));

        let result = client(mock)
            .fetch("/genre/movie/list", QueryParams::new().with("language", "en"))
            .await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_transient_failures() {
        let mut mock = MockUpstreamTransport::new();
        let mut calls = 0;
        mock.expect_get().times(3).returning(move |_, _| {
            calls += 1;
            match calls {
                1 => Err(TransportError::Network("connection reset".to_string())),
                2 => Err(TransportError::Status(502)),
                _ => Ok(json!({"results": [{"id": 1}]})),
            }
        });

        let started = Instant::now();
        let document = client(mock)
            .fetch("/movie/popular", QueryParams::new())
            .await
            .unwrap();

        assert_eq!(document, json!({"results": [{"id": 1}]}));
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Err(TransportError::Status(404)));

        let started = Instant::now();
        let result = client(mock).fetch("/movie/1", QueryParams::new()).await;

        assert_eq!(result, Err(UpstreamError::NotFound));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_is_service_unavailable() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .times(3)
            .returning(|_, _| Err(TransportError::Status(500)));

        let started = Instant::now();
        let result = client(mock).fetch("/movie/popular", QueryParams::new()).await;

        assert_eq!(result, Err(UpstreamError::ServiceUnavailable { attempts: 3 }));
        // no wait after the final attempt
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4));
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Err(TransportError::Malformed("expected value".to_string())));

        let result = client(mock).fetch("/movie/popular", QueryParams::new()).await;
        assert!(matches!(result, Err(UpstreamError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_zero_attempt_budget_still_tries_once() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Err(TransportError::Network("timed out".to_string())));

        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let client = UpstreamClient::new(Arc::new(mock), "k".to_string(), policy);
        let result = client.fetch("/movie/popular", QueryParams::new()).await;
        assert_eq!(result, Err(UpstreamError::ServiceUnavailable { attempts: 1 }));
    }

    #[tokio::test]
    async fn test_fetch_results_reads_results_array() {
        let mut mock = MockUpstreamTransport::new();
        mock.expect_get()
            .returning(|_, _| Ok(json!({"page": 1, "results": [{"id": 7}, {"id": 8}]})));

        let records = client(mock)
            .fetch_results("/discover/movie", QueryParams::new())
            .await
            .unwrap();
        let ids: Vec<_> = records.iter().filter_map(MovieRecord::id).collect();
        assert_eq!(ids, vec![7, 8]);
    }
}
