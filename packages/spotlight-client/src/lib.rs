//! Pure DBpedia Spotlight REST API client.
//!
//! A minimal client for a Spotlight-style named-entity-linking service.
//! Supports readiness probing (the service is slow to warm up), annotate
//! requests with tuning options, and bounded retry with capped exponential
//! backoff on transient failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use spotlight_client::{AnnotateOptions, SpotlightClient};
//! use std::time::Duration;
//!
//! let client = SpotlightClient::new("localhost:2222");
//! client.wait_until_ready(Duration::from_secs(60)).await?;
//!
//! let resources = client
//!     .annotate("Paris is the capital of France.", &AnnotateOptions::default())
//!     .await?;
//! for resource in &resources {
//!     println!("{} @ {}", resource.surface_form, resource.offset);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SpotlightError};
pub use types::{AnnotateOptions, AnnotateResponse, FilterPolicy, RawResource};

use std::time::Duration;
use tracing::{debug, warn};

/// HTTP statuses treated as transient and retried.
const RETRYABLE_STATUSES: [u16; 3] = [502, 503, 504];

/// Retry policy for transient annotate failures.
///
/// Delays grow as `base_delay * 2^attempt`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total request attempts before giving up.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retrying after the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        exp.min(self.max_delay)
    }
}

/// Client for a Spotlight-style annotate endpoint.
///
/// Owns a single pooled `reqwest::Client`, configured once at
/// construction and read-only thereafter. Not intended to be shared
/// across concurrently executing pipeline runs.
pub struct SpotlightClient {
    client: reqwest::Client,
    annotate_url: String,
    retry: RetryPolicy,
    probe_interval: Duration,
}

impl SpotlightClient {
    /// Create a client for the service at `address` (host:port).
    pub fn new(address: &str) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            annotate_url: format!("http://{}/rest/annotate", address),
            retry: RetryPolicy::default(),
            probe_interval: Duration::from_millis(500),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the delay between readiness probe attempts.
    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The annotate endpoint URL this client targets.
    pub fn annotate_url(&self) -> &str {
        &self.annotate_url
    }

    /// Probe the service until it answers, absorbing slow start-up.
    ///
    /// Any HTTP response at all counts as ready; the probe only guards
    /// against the service not yet listening. Exceeding `timeout` is
    /// fatal to the session.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        debug!(url = %self.annotate_url, "waiting for spotlight service");
        let started = tokio::time::Instant::now();

        loop {
            match self.client.get(&self.annotate_url).send().await {
                Ok(response) => {
                    debug!(status = %response.status(), "spotlight service is up");
                    return Ok(());
                }
                Err(e) => {
                    if started.elapsed() >= timeout {
                        warn!(
                            url = %self.annotate_url,
                            error = %e,
                            "readiness probe timed out"
                        );
                        return Err(SpotlightError::ProbeTimeout {
                            waited_ms: timeout.as_millis() as u64,
                        });
                    }
                    debug!(error = %e, "spotlight service not ready yet");
                    tokio::time::sleep(self.probe_interval).await;
                }
            }
        }
    }

    /// Annotate `text`, returning the raw entity records.
    ///
    /// Transient failures (502/503/504, connection errors) are retried
    /// per the client's [`RetryPolicy`]. A success response with no
    /// decodable `Resources` collection is [`SpotlightError::InvalidResponse`];
    /// an empty `Resources` array is the valid zero-entities result and
    /// returns `Ok(vec![])`.
    pub async fn annotate(
        &self,
        text: &str,
        options: &AnnotateOptions,
    ) -> Result<Vec<RawResource>> {
        let mut params = vec![("text".to_string(), text.to_string())];
        params.extend(options.to_params());

        let mut attempt: u32 = 0;
        loop {
            let outcome = self
                .client
                .post(&self.annotate_url)
                .form(&params)
                .send()
                .await;

            let transient = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if !RETRYABLE_STATUSES.contains(&status.as_u16()) {
                        if !status.is_success() {
                            let body = response.text().await.unwrap_or_default();
                            return Err(SpotlightError::Api {
                                status: status.as_u16(),
                                message: body,
                            });
                        }
                        return Self::decode_response(response).await;
                    }
                    debug!(status = %status, attempt, "transient spotlight status");
                    format!("HTTP {}", status)
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    debug!(error = %e, attempt, "transient spotlight transport error");
                    e.to_string()
                }
                Err(e) => return Err(SpotlightError::Http(e)),
            };

            attempt += 1;
            if attempt >= self.retry.max_attempts {
                warn!(attempts = attempt, "spotlight retry budget exhausted");
                return Err(SpotlightError::ServiceUnavailable {
                    attempts: attempt,
                    message: transient,
                });
            }
            tokio::time::sleep(self.retry.delay_for(attempt - 1)).await;
        }
    }

    async fn decode_response(response: reqwest::Response) -> Result<Vec<RawResource>> {
        let body: AnnotateResponse =
            response
                .json()
                .await
                .map_err(|e| SpotlightError::InvalidResponse {
                    reason: format!("undecodable body: {}", e),
                })?;

        body.resources.ok_or_else(|| SpotlightError::InvalidResponse {
            reason: "response lacks the Resources collection".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_url_from_address() {
        let client = SpotlightClient::new("localhost:2222");
        assert_eq!(client.annotate_url(), "http://localhost:2222/rest/annotate");
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        // 100ms * 2^10 = ~102s, capped at 5s
        assert_eq!(policy.delay_for(10), Duration::from_secs(5));
    }

    #[test]
    fn backoff_large_attempt_does_not_overflow() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), policy.max_delay);
    }

    #[test]
    fn retryable_statuses_are_the_5xx_gateway_set() {
        assert!(RETRYABLE_STATUSES.contains(&502));
        assert!(RETRYABLE_STATUSES.contains(&503));
        assert!(RETRYABLE_STATUSES.contains(&504));
        assert!(!RETRYABLE_STATUSES.contains(&500));
        assert!(!RETRYABLE_STATUSES.contains(&404));
    }
}
