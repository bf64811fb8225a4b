//! Linking service seam and the Spotlight-backed implementation.
//!
//! The orchestrator talks to the linking service through the
//! [`LinkingService`] trait so tests can substitute a mock;
//! [`SpotlightLinker`] adapts the `spotlight-client` package, converting
//! wire records into [`RawMention`]s and mapping client errors onto the
//! linking taxonomy.

use async_trait::async_trait;
use std::time::Duration;

use spotlight_client::{AnnotateOptions, RawResource, SpotlightClient, SpotlightError};

use crate::error::{LinkingError, Result};
use crate::types::mention::RawMention;

/// The pipeline's view of the entity-linking service.
#[async_trait]
pub trait LinkingService: Send + Sync {
    /// Block until the service is reachable. Failure is fatal to the
    /// session; the orchestrator calls this before the first document.
    async fn ensure_ready(&self) -> Result<()>;

    /// Annotate text, returning raw mention records.
    async fn annotate(&self, text: &str, options: &AnnotateOptions) -> Result<Vec<RawMention>>;
}

/// [`LinkingService`] backed by a Spotlight annotate endpoint.
pub struct SpotlightLinker {
    client: SpotlightClient,
    ready_timeout: Duration,
}

impl SpotlightLinker {
    /// Wrap a configured client. The readiness timeout defaults to 60s
    /// to absorb the service's slow model loading.
    pub fn new(client: SpotlightClient) -> Self {
        Self {
            client,
            ready_timeout: Duration::from_secs(60),
        }
    }

    /// Set the readiness probe timeout.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Convert a wire record, parsing the string-encoded offset.
    ///
    /// Empty-string URI and types fields mean "absent" on the wire.
    fn convert(resource: RawResource) -> Result<RawMention> {
        let offset = resource
            .offset
            .parse::<usize>()
            .map_err(|_| LinkingError::InvalidResponse {
                reason: format!(
                    "non-numeric offset {:?} for surface form {:?}",
                    resource.offset, resource.surface_form
                ),
            })?;

        Ok(RawMention {
            surface_form: resource.surface_form,
            offset,
            uri: resource.uri.filter(|uri| !uri.is_empty()),
            types: resource.types.filter(|types| !types.is_empty()),
        })
    }

    fn map_error(error: SpotlightError) -> LinkingError {
        match error {
            SpotlightError::InvalidResponse { reason } => LinkingError::InvalidResponse { reason },
            SpotlightError::Api { status, message } => LinkingError::InvalidResponse {
                reason: format!("HTTP {}: {}", status, message),
            },
            other => LinkingError::ServiceUnavailable(Box::new(other)),
        }
    }
}

#[async_trait]
impl LinkingService for SpotlightLinker {
    async fn ensure_ready(&self) -> Result<()> {
        self.client
            .wait_until_ready(self.ready_timeout)
            .await
            .map_err(|e| LinkingError::ServiceUnavailable(Box::new(e)))
    }

    async fn annotate(&self, text: &str, options: &AnnotateOptions) -> Result<Vec<RawMention>> {
        let resources = self
            .client
            .annotate(text, options)
            .await
            .map_err(Self::map_error)?;

        resources.into_iter().map(Self::convert).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(surface_form: &str, offset: &str) -> RawResource {
        RawResource {
            surface_form: surface_form.to_string(),
            offset: offset.to_string(),
            uri: None,
            types: None,
        }
    }

    #[test]
    fn converts_string_offset() {
        let mut raw = resource("Paris", "42");
        raw.uri = Some("http://dbpedia.org/resource/Paris".to_string());
        let mention = SpotlightLinker::convert(raw).unwrap();
        assert_eq!(mention.offset, 42);
        assert_eq!(mention.surface_form, "Paris");
        assert!(mention.uri.is_some());
    }

    #[test]
    fn empty_uri_and_types_become_absent() {
        let mut raw = resource("Paris", "0");
        raw.uri = Some(String::new());
        raw.types = Some(String::new());
        let mention = SpotlightLinker::convert(raw).unwrap();
        assert!(mention.uri.is_none());
        assert!(mention.types.is_none());
    }

    #[test]
    fn non_numeric_offset_is_invalid_response() {
        let err = SpotlightLinker::convert(resource("Paris", "ten")).unwrap_err();
        assert!(matches!(err, LinkingError::InvalidResponse { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn transport_errors_map_to_service_unavailable() {
        let err = SpotlightLinker::map_error(SpotlightError::ServiceUnavailable {
            attempts: 10,
            message: "HTTP 503".to_string(),
        });
        assert!(err.is_fatal());

        let err = SpotlightLinker::map_error(SpotlightError::ProbeTimeout { waited_ms: 60_000 });
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_bodies_map_to_invalid_response() {
        let err = SpotlightLinker::map_error(SpotlightError::InvalidResponse {
            reason: "response lacks the Resources collection".to_string(),
        });
        assert!(matches!(err, LinkingError::InvalidResponse { .. }));
        assert!(!err.is_fatal());
    }
}
