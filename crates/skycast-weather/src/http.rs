//! Shared HTTP client for the geocoding and forecast providers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{TransportError, WeatherError};

/// Per-request timeout applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("Skycast/", env!("CARGO_PKG_VERSION"));

/// Cheap-to-clone client with a bounded timeout and retry policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    retry: RetryConfig,
}

impl HttpClient {
    pub fn new(timeout: Duration, retry: RetryConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            retry,
        })
    }

    /// GET `url` with `query` parameters and decode a JSON body.
    ///
    /// Non-2xx statuses become [`TransportError::Status`]; a 2xx body that is
    /// not the expected JSON becomes [`WeatherError::MalformedResponse`].
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        tracing::debug!(url, ?query, "GET");

        let response = with_retry(&self.retry, || self.client.get(url).query(query).send()).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned status {}", url, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Failed to parse response from {}: {}", url, e);
            WeatherError::MalformedResponse(e.to_string())
        })
    }
}
