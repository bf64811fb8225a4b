//! Mention types: raw service records and normalized pipeline output.

use serde::{Deserialize, Serialize};

/// One entity record from the linking service, after wire decoding.
///
/// Lives only for the duration of one request/response cycle; the
/// pipeline converts each record with a non-empty surface form into
/// exactly one [`NormalizedMention`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMention {
    /// Exact substring matched in the source text.
    pub surface_form: String,

    /// Zero-based character index where the match begins.
    pub offset: usize,

    /// Canonical concept URI; `None` when the service could not
    /// disambiguate the mention.
    pub uri: Option<String>,

    /// Comma-delimited type tags; `None` when the service reported none.
    pub types: Option<String>,
}

impl RawMention {
    /// Create a mention with no URI and no type tags.
    pub fn new(surface_form: impl Into<String>, offset: usize) -> Self {
        Self {
            surface_form: surface_form.into(),
            offset,
            uri: None,
            types: None,
        }
    }

    /// Set the canonical concept URI.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the comma-delimited type tags.
    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }
}

/// Coarse semantic category, a fixed closed set.
///
/// `Unclassified` serializes as the empty string and means "the tags
/// intersected no category". It is a normal outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Person,
    Location,
    Organization,
    Product,
    Event,
    Title,
    #[default]
    #[serde(rename = "", other)]
    Unclassified,
}

impl Category {
    /// The wire/display form; empty string for `Unclassified`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Person => "person",
            Category::Location => "location",
            Category::Organization => "organization",
            Category::Product => "product",
            Category::Event => "event",
            Category::Title => "title",
            Category::Unclassified => "",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's output unit: one grounded, categorized entity span.
///
/// Immutable once emitted into an annotation layer. `grounding` is
/// never null: the first element, when present, is the canonical URI
/// from the linking service, followed by secondary knowledge-graph
/// identifiers; the empty vector means no disambiguation was possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMention {
    /// Copy of the matched surface form.
    pub text: String,

    /// Start character offset into the source text.
    pub start: usize,

    /// End character offset; `end == start + char_count(text)`.
    pub end: usize,

    /// Coarse semantic category.
    pub category: Category,

    /// Canonical URI plus cross-referenced identifiers, possibly empty.
    pub grounding: Vec<String>,
}

impl NormalizedMention {
    /// The canonical URI, if the mention was disambiguated.
    pub fn canonical_uri(&self) -> Option<&str> {
        self.grounding.first().map(String::as_str)
    }

    /// Secondary identifiers resolved from the knowledge graph.
    pub fn secondary_identifiers(&self) -> &[String] {
        if self.grounding.is_empty() {
            &[]
        } else {
            &self.grounding[1..]
        }
    }
}
