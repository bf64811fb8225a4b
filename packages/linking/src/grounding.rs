//! Grounding resolution: cross-referencing canonical concept URIs into
//! a secondary knowledge graph.
//!
//! The resolver is an explicit object constructed with endpoint
//! configuration and passed to the orchestrator, so tests can substitute
//! a double and no process-global query client exists.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{LinkingError, Result};

/// Resolves a canonical concept URI into equivalent identifiers in a
/// target knowledge graph.
#[async_trait]
pub trait GroundingResolver: Send + Sync {
    /// Resolve cross-referenced identifiers for a concept.
    ///
    /// An empty list is a normal outcome (many concepts have no
    /// registered cross-reference, and an unreachable endpoint degrades
    /// the same way). `Err` is reserved for malformed endpoint data;
    /// callers must isolate it per mention.
    async fn resolve(&self, concept_uri: &str) -> Result<Vec<String>>;
}

/// How the concept identifier is embedded into the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IriMode {
    /// Embed the full IRI: `<http://dbpedia.org/resource/Paris>`.
    FullIri,

    /// Embed as a namespace-qualified local name: `dbpedia:Paris`.
    Prefixed { prefix: String },
}

/// Configuration for [`SparqlResolver`].
#[derive(Debug, Clone)]
pub struct SparqlConfig {
    /// SPARQL-protocol endpoint URL.
    pub endpoint: String,

    /// Substring that identifies the target namespace in `sameAs` links.
    pub target_namespace: String,

    /// Result cap per query.
    pub limit: usize,

    /// Identifier embedding mode.
    pub iri_mode: IriMode,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://dbpedia.org/sparql".to_string(),
            target_namespace: "www.wikidata.org".to_string(),
            limit: 10,
            iri_mode: IriMode::FullIri,
        }
    }
}

impl SparqlConfig {
    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the target namespace filter.
    pub fn with_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = namespace.into();
        self
    }

    /// Set the result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the identifier embedding mode.
    pub fn with_iri_mode(mut self, iri_mode: IriMode) -> Self {
        self.iri_mode = iri_mode;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// `owl:sameAs` resolver against a SPARQL-protocol endpoint.
pub struct SparqlResolver {
    client: reqwest::Client,
    config: SparqlConfig,
}

impl Default for SparqlResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparqlResolver {
    /// Create a resolver with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SparqlConfig::default())
    }

    /// Create a resolver with a custom configuration.
    pub fn with_config(config: SparqlConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Build the same-as query for a concept.
    ///
    /// The identifier originates from a trusted service response;
    /// upstream validation is responsible for query-unsafe characters.
    fn build_query(&self, concept_uri: &str) -> String {
        let subject = match &self.config.iri_mode {
            IriMode::FullIri => format!("<{}>", concept_uri),
            IriMode::Prefixed { prefix } => {
                let local_name = concept_uri.rsplit('/').next().unwrap_or(concept_uri);
                format!("{}:{}", prefix, local_name)
            }
        };
        format!(
            "SELECT DISTINCT ?same WHERE {{ {} owl:sameAs ?same FILTER (regex(str(?same), \"{}\")) }} LIMIT {}",
            subject, self.config.target_namespace, self.config.limit
        )
    }
}

#[async_trait]
impl GroundingResolver for SparqlResolver {
    async fn resolve(&self, concept_uri: &str) -> Result<Vec<String>> {
        let query = self.build_query(concept_uri);
        debug!(uri = %concept_uri, "querying knowledge graph");

        let response = match self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("query", query.as_str()),
                ("format", "application/sparql-results+json"),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.config.endpoint, error = %e, "knowledge-graph endpoint unreachable");
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.config.endpoint, status = %status, "knowledge-graph endpoint error status");
            return Ok(Vec::new());
        }

        let results: SparqlResults = response
            .json()
            .await
            .map_err(|e| LinkingError::GroundingQueryFailed(Box::new(e)))?;

        let identifiers: Vec<String> = results
            .results
            .bindings
            .into_iter()
            .flat_map(|binding| binding.into_values().map(|v| v.value))
            .collect();

        debug!(uri = %concept_uri, matches = identifiers.len(), "knowledge-graph query complete");
        Ok(identifiers)
    }
}
