use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::FetchConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Giving up on {url} after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// Delay before retrying after attempt `attempt_index` (zero-based) failed.
pub fn backoff_delay(base: Duration, attempt_index: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

/// HTTP GET of JSON documents with bounded exponential-backoff retry.
#[derive(Clone)]
pub struct RetryingFetcher {
    client: Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryingFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        })
    }

    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.fetch_json_with_attempts(url, self.max_attempts).await
    }

    pub async fn fetch_json_with_attempts(
        &self,
        url: &str,
        max_attempts: u32,
    ) -> Result<serde_json::Value, FetchError> {
        let max_attempts = max_attempts.max(1);

        let mut attempt = 0;
        loop {
            let err = match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            attempt += 1;

            if attempt >= max_attempts {
                error!(
                    "Fetch of {} failed after {} attempt(s): {}",
                    url, max_attempts, err
                );
                return Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: max_attempts,
                    last: Box::new(err),
                });
            }

            let delay = backoff_delay(self.base_delay, attempt - 1);
            warn!(
                "Fetch attempt {}/{} for {} failed: {}. Retrying in {:?}",
                attempt, max_attempts, url, err, delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn get_once(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
