//! Typed errors for the Spotlight client.

use thiserror::Error;

/// Errors returned by [`SpotlightClient`](crate::SpotlightClient) operations.
#[derive(Debug, Error)]
pub enum SpotlightError {
    /// Readiness probe exhausted its timeout; the service never came up.
    #[error("spotlight service not ready after {waited_ms}ms of probing")]
    ProbeTimeout { waited_ms: u64 },

    /// Retry budget exhausted against a service that was previously reachable.
    #[error("spotlight service unavailable after {attempts} attempts: {message}")]
    ServiceUnavailable { attempts: u32, message: String },

    /// Non-transient HTTP error status (anything outside 2xx and 502/503/504).
    #[error("spotlight API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP success, but the body was undecodable or lacked the
    /// `Resources` collection. An empty `Resources` array is NOT this
    /// error; it is the valid zero-entities result.
    #[error("invalid spotlight response: {reason}")]
    InvalidResponse { reason: String },

    /// Transport-level error outside the retry loop.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Spotlight client operations.
pub type Result<T> = std::result::Result<T, SpotlightError>;
