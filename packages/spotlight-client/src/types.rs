//! Wire types and tuning options for the Spotlight annotate endpoint.

use serde::{Deserialize, Serialize};

/// Entity-type filter policy for the annotate endpoint.
///
/// `Whitelist` keeps only entities matching the `types` filter;
/// `Blacklist` keeps only entities NOT matching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    #[default]
    Whitelist,
    Blacklist,
}

impl FilterPolicy {
    /// Wire representation used in the form-encoded request.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPolicy::Whitelist => "whitelist",
            FilterPolicy::Blacklist => "blacklist",
        }
    }
}

/// Tuning options for an annotate request.
///
/// Defaults match the service's documented defaults: confidence 0.5,
/// support 0, no type filter, whitelist policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateOptions {
    /// Disambiguation confidence threshold for linking.
    pub confidence: f64,

    /// Resource prominence lower bound (number of Wikipedia in-links).
    pub support: u32,

    /// Comma-delimited entity-type filter, e.g. `"Person,Place"`.
    pub types: Option<String>,

    /// How the `types` filter is applied.
    pub policy: FilterPolicy,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            confidence: 0.5,
            support: 0,
            types: None,
            policy: FilterPolicy::default(),
        }
    }
}

impl AnnotateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the support threshold.
    pub fn with_support(mut self, support: u32) -> Self {
        self.support = support;
        self
    }

    /// Set the entity-type filter.
    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// Set the filter policy.
    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render the options as form parameters, in a stable order.
    ///
    /// The `types` field is omitted when unset; the service treats an
    /// empty filter and an absent one differently.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("confidence".to_string(), self.confidence.to_string()),
            ("support".to_string(), self.support.to_string()),
        ];
        if let Some(types) = &self.types {
            params.push(("types".to_string(), types.clone()));
        }
        params.push(("policy".to_string(), self.policy.as_str().to_string()));
        params
    }
}

/// Top-level annotate response body.
///
/// `resources` is `None` when the `Resources` key is absent entirely,
/// which callers must treat as a malformed response; zero detected
/// entities arrives as `Some(vec![])`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateResponse {
    #[serde(rename = "Resources")]
    pub resources: Option<Vec<RawResource>>,
}

/// One entity record as returned by the annotate endpoint.
///
/// Spotlight string-encodes every field, including `@offset`; parsing
/// the offset into an integer is left to the consumer so that a bad
/// record can be reported against its document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResource {
    /// Exact substring matched in the source text.
    #[serde(rename = "@surfaceForm")]
    pub surface_form: String,

    /// Zero-based character index of the match, string-encoded.
    #[serde(rename = "@offset")]
    pub offset: String,

    /// Canonical concept URI; absent when disambiguation failed.
    #[serde(rename = "@URI", default)]
    pub uri: Option<String>,

    /// Comma-delimited type tags; may be absent or empty.
    #[serde(rename = "@types", default)]
    pub types: Option<String>,
}
