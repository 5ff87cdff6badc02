//! Forward geocoding: convert a free-text place name to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use serde::Deserialize;
use tracing::instrument;

use crate::http::HttpClient;
use crate::types::{valid_coordinates, Location, WeatherError};

pub const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
const SEARCH_PATH: &str = "/v1/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
}

/// Resolves city names to a [`Location`], taking the provider's first match.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: HttpClient,
    base_url: String,
    max_candidates: Option<u32>,
}

impl Geocoder {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: GEOCODING_BASE_URL.to_string(),
            max_candidates: Some(1),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Limit the number of candidates the provider returns; `None` leaves
    /// the provider default in place. Only the first candidate is used either way.
    pub fn with_max_candidates(mut self, count: Option<u32>) -> Self {
        self.max_candidates = count;
        self
    }

    /// Resolve `query` to the provider's first matching location.
    ///
    /// # Errors
    /// - [`WeatherError::EmptyQuery`] for blank input, without any request
    /// - [`WeatherError::NotFound`] when the provider has no match
    /// - [`WeatherError::Transport`] / [`WeatherError::MalformedResponse`]
    ///   when the lookup itself failed
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, query: &str) -> Result<Location, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        let mut params = vec![
            ("name", query.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(count) = self.max_candidates {
            params.push(("count", count.to_string()));
        }

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let body: SearchResponse = self.http.get_json(&url, &params).await?;

        let first = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::NotFound(query.to_string()))?;

        if !valid_coordinates(first.latitude, first.longitude) {
            return Err(WeatherError::MalformedResponse(format!(
                "geocoding result for {:?} has out-of-range coordinates ({}, {})",
                query, first.latitude, first.longitude
            )));
        }

        let location = Location {
            query: query.to_string(),
            latitude: first.latitude,
            longitude: first.longitude,
            resolved_name: first.name,
            country: first.country.unwrap_or_default(),
            admin1: first.admin1,
            timezone: first.timezone,
        };

        tracing::info!(
            "Resolved {:?} to {} ({:.4}, {:.4})",
            query,
            location.display_name(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DEFAULT_TIMEOUT;
    use crate::retry::RetryConfig;

    fn geocoder() -> Geocoder {
        // Nothing listens on port 9; any request would fail with a transport error.
        let http = HttpClient::new(DEFAULT_TIMEOUT, RetryConfig::disabled()).unwrap();
        Geocoder::new(http).with_base_url("http://127.0.0.1:9/")
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let result = geocoder().resolve("").await;
        assert!(matches!(result, Err(WeatherError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_whitespace_query_short_circuits() {
        let result = geocoder().resolve("   \t\n").await;
        assert!(matches!(result, Err(WeatherError::EmptyQuery)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(geocoder().base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn test_missing_results_key_parses() {
        let body: SearchResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(body.results.is_none());
    }
}
