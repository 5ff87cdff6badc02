//! Bounded retry with exponential backoff for geocoding and forecast requests.
//!
//! Transient failures are retried:
//! - Timeouts
//! - Connection refused or reset
//! - 5xx server errors
//! - 408 Request Timeout and 429 Too Many Requests
//!
//! It does NOT retry:
//! - Other 4xx client errors (bad parameters, unknown endpoint)
//! - Request construction errors
//! - Payload problems; a body that fails to decode is reported as malformed
//!   by the caller, never retried

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// Default retry configuration
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// A single attempt, no retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        // Exponential backoff: initial_delay * 2^attempt, capped at max_delay
        let factor = 2u64.saturating_pow(attempt);
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(initial_ms.saturating_mul(factor).min(max_ms))
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Worth another attempt
    Retry,
    /// Permanent failure, return it as is
    NoRetry,
}

/// Check if a reqwest error is worth another attempt
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() {
        tracing::debug!("Request timed out, will retry");
        return RetryDecision::Retry;
    }

    // Refused or reset connections usually clear up on their own
    if error.is_connect() {
        tracing::debug!("Connection error, will retry");
        return RetryDecision::Retry;
    }

    // Building the request failed; sending it again changes nothing
    if error.is_request() {
        tracing::debug!("Request error, not retryable");
        return RetryDecision::NoRetry;
    }

    if let Some(status) = error.status() {
        return is_retryable_status(status);
    }

    // Unknown errors are not retried
    RetryDecision::NoRetry
}

/// Check if a status code is worth another attempt
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error() {
        tracing::debug!("Server error ({}), will retry", status);
        return RetryDecision::Retry;
    }

    // Open-Meteo rate-limits free usage with 429
    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::debug!("Rate limited (429), will retry");
        return RetryDecision::Retry;
    }

    if status == StatusCode::REQUEST_TIMEOUT {
        tracing::debug!("Request timeout (408), will retry");
        return RetryDecision::Retry;
    }

    // Remaining 4xx: the query itself is wrong
    if status.is_client_error() {
        tracing::debug!("Client error ({}), not retryable", status);
    }

    RetryDecision::NoRetry
}

/// Execute an HTTP request, retrying transient failures.
///
/// Returns the first non-retryable response (which may still carry an error
/// status) or the last error once attempts are exhausted.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            tracing::debug!(
                "Retry attempt {} of {}, waiting {:?}",
                attempt,
                config.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            // A response with an error status is retried only while attempts remain
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) == RetryDecision::Retry
                    && attempt < config.max_retries
                {
                    tracing::warn!(
                        "Request returned retryable status {}, attempt {} of {}",
                        status,
                        attempt + 1,
                        config.max_retries + 1
                    );
                    attempt += 1;
                    continue;
                }

                if attempt > 0 {
                    tracing::info!("Request completed after {} retries", attempt);
                }
                return Ok(response);
            }
            Err(e) => {
                if is_retryable_error(&e) == RetryDecision::NoRetry
                    || attempt >= config.max_retries
                {
                    return Err(e);
                }

                tracing::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    config.max_retries + 1,
                    e
                );
                attempt += 1;
            }
        }
    }
}
