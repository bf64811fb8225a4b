//! Typed errors for the linking pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. The taxonomy encodes the
//! propagation policy: run-fatal, document-fatal, and absorbed.

use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during an annotation run.
#[derive(Debug, Error)]
pub enum LinkingError {
    /// Linking service unreachable: readiness probe timed out or the
    /// retry budget was exhausted mid-run. Fatal to the whole run.
    #[error("linking service unavailable: {0}")]
    ServiceUnavailable(#[source] Source),

    /// The service answered with success but a malformed body (missing
    /// resource collection, undecodable record). Fatal to the current
    /// document only; the run continues.
    #[error("invalid linking response: {reason}")]
    InvalidResponse { reason: String },

    /// Knowledge-graph lookup returned malformed data. Recovered per
    /// mention as an empty secondary identifier list.
    #[error("grounding query failed: {0}")]
    GroundingQueryFailed(#[source] Source),

    /// Category lookup (structured or scraped) failed. Recovered as the
    /// empty category.
    #[error("classification unavailable: {reason}")]
    ClassificationUnavailable { reason: String },
}

impl LinkingError {
    /// Whether this error aborts the whole run rather than one document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LinkingError::ServiceUnavailable(_))
    }
}

/// Result type alias for linking operations.
pub type Result<T> = std::result::Result<T, LinkingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_service_unavailable_is_fatal() {
        let unavailable = LinkingError::ServiceUnavailable("probe timed out".into());
        assert!(unavailable.is_fatal());

        let invalid = LinkingError::InvalidResponse {
            reason: "missing Resources".to_string(),
        };
        assert!(!invalid.is_fatal());

        let grounding = LinkingError::GroundingQueryFailed("bad bindings".into());
        assert!(!grounding.is_fatal());
    }
}
