/// TMDB transport over reqwest
///
/// Performs exactly one HTTP exchange per call and reports how it failed;
/// retrying is left to [`super::UpstreamClient`].
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use super::{QueryParams, TransportError, UpstreamTransport};

#[derive(Clone)]
pub struct HttpTransport {
    http_client: HttpClient,
    api_url: String,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl UpstreamTransport for HttpTransport {
    async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<Value, TransportError> {
        let url = self.url(endpoint);

        // Errors drop the URL: it carries the API key in its query string.
        let response = self
            .http_client
            .get(&url)
            .query(params.as_slice())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                endpoint = %endpoint,
                status = %status,
                body = %body,
                "Upstream returned error status"
            );
            return Err(TransportError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                TransportError::Malformed(e.without_url().to_string())
            } else {
                TransportError::Network(e.without_url().to_string())
            }
        })
    }
}
