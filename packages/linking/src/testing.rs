//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that embed the pipeline
//! without making real linking-service or knowledge-graph calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use spotlight_client::AnnotateOptions;

use crate::error::{LinkingError, Result};
use crate::grounding::GroundingResolver;
use crate::linker::LinkingService;
use crate::types::mention::RawMention;

/// A mock linking service with scripted responses and call tracking.
#[derive(Default)]
pub struct MockLinker {
    /// Scripted mention lists, keyed by submitted text.
    responses: Arc<RwLock<HashMap<String, Vec<RawMention>>>>,

    /// Texts that should produce a malformed-response error.
    invalid_texts: Arc<RwLock<HashSet<String>>>,

    /// When set, the service is unreachable: readiness fails and every
    /// annotate call is fatal.
    unavailable: bool,

    /// Submitted texts, in call order.
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockLinker {
    /// Create a mock that answers every text with zero mentions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a mention list for a text.
    pub fn with_response(self, text: impl Into<String>, mentions: Vec<RawMention>) -> Self {
        self.responses.write().unwrap().insert(text.into(), mentions);
        self
    }

    /// Make a text produce `InvalidResponse` (e.g. missing Resources key).
    pub fn with_invalid_response(self, text: impl Into<String>) -> Self {
        self.invalid_texts.write().unwrap().insert(text.into());
        self
    }

    /// Make the whole service unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Texts submitted so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of annotate calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl LinkingService for MockLinker {
    async fn ensure_ready(&self) -> Result<()> {
        if self.unavailable {
            return Err(LinkingError::ServiceUnavailable(
                "readiness probe timed out".into(),
            ));
        }
        Ok(())
    }

    async fn annotate(&self, text: &str, _options: &AnnotateOptions) -> Result<Vec<RawMention>> {
        self.calls.write().unwrap().push(text.to_string());

        if self.unavailable {
            return Err(LinkingError::ServiceUnavailable(
                "service unreachable".into(),
            ));
        }
        if self.invalid_texts.read().unwrap().contains(text) {
            return Err(LinkingError::InvalidResponse {
                reason: "response lacks the Resources collection".to_string(),
            });
        }
        Ok(self
            .responses
            .read()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_default())
    }
}

/// A mock grounding resolver with scripted identifiers and call tracking.
///
/// Tracks every resolved URI so tests can assert the resolver was never
/// invoked for un-disambiguated mentions.
#[derive(Default)]
pub struct MockResolver {
    /// Scripted identifier lists, keyed by concept URI.
    identifiers: Arc<RwLock<HashMap<String, Vec<String>>>>,

    /// URIs whose resolution should fail with `GroundingQueryFailed`.
    failing: Arc<RwLock<HashSet<String>>>,

    /// Resolved URIs, in call order.
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockResolver {
    /// Create a mock that resolves every URI to zero identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script identifiers for a concept URI.
    pub fn with_identifiers(self, uri: impl Into<String>, identifiers: Vec<String>) -> Self {
        self.identifiers
            .write()
            .unwrap()
            .insert(uri.into(), identifiers);
        self
    }

    /// Make a URI fail resolution.
    pub fn with_failure(self, uri: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(uri.into());
        self
    }

    /// URIs resolved so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of resolve calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl GroundingResolver for MockResolver {
    async fn resolve(&self, concept_uri: &str) -> Result<Vec<String>> {
        self.calls.write().unwrap().push(concept_uri.to_string());

        if self.failing.read().unwrap().contains(concept_uri) {
            return Err(LinkingError::GroundingQueryFailed(
                "malformed bindings".into(),
            ));
        }
        Ok(self
            .identifiers
            .read()
            .unwrap()
            .get(concept_uri)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_linker_tracks_calls() {
        let linker = MockLinker::new()
            .with_response("hello", vec![RawMention::new("hello", 0)]);

        let options = AnnotateOptions::default();
        let mentions = linker.annotate("hello", &options).await.unwrap();
        assert_eq!(mentions.len(), 1);

        let none = linker.annotate("unscripted", &options).await.unwrap();
        assert!(none.is_empty());

        assert_eq!(linker.calls(), vec!["hello", "unscripted"]);
    }

    #[tokio::test]
    async fn mock_resolver_failure_injection() {
        let resolver = MockResolver::new().with_failure("http://bad.example/uri");
        let err = resolver.resolve("http://bad.example/uri").await.unwrap_err();
        assert!(matches!(err, LinkingError::GroundingQueryFailed(_)));
        assert_eq!(resolver.call_count(), 1);
    }
}
