//! Document container boundary types.
//!
//! The pipeline consumes an iterable of text-bearing documents and
//! produces annotation layers attached by document id. The exact
//! on-disk serialization of the container is out of scope; these types
//! round-trip through JSON so collections can be loaded and saved by
//! embedding applications.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::mention::{Category, NormalizedMention};

/// A source document carrying linkable text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDocument {
    /// Stable identifier, unique within the collection.
    pub id: String,

    /// Full text value.
    pub text: String,

    /// Where the text came from, if known (file path, URL).
    pub source: Option<String>,
}

impl TextDocument {
    /// Create a document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: None,
        }
    }

    /// Set the document source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the document has any linkable text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Text length in characters (the unit all offsets are measured in).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One entity annotation inside a layer.
///
/// Carries the five normalized-mention attributes; which document it
/// annotates is recorded by the layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    /// Identifier unique within the layer.
    pub id: String,

    /// Start character offset.
    pub start: usize,

    /// End character offset.
    pub end: usize,

    /// Coarse semantic category; empty when unclassifiable.
    pub category: Category,

    /// The matched surface form.
    pub text: String,

    /// Canonical URI plus cross-referenced identifiers, possibly empty.
    pub grounding: Vec<String>,
}

/// An annotation layer: the output of one pipeline pass over one document.
///
/// Created and signed (producing app + options) before any annotation is
/// added, so a consumer can tell "processed, zero entities found" from
/// "not processed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationLayer {
    /// Layer identifier, unique within the collection.
    pub id: String,

    /// The document this layer annotates.
    pub document_id: String,

    /// Identity of the producing pipeline.
    pub app: String,

    /// Tuning options the pipeline ran with, in submission order.
    pub parameters: IndexMap<String, String>,

    /// When the layer was created.
    pub created_at: DateTime<Utc>,

    /// Entity annotations, one per normalized mention.
    pub annotations: Vec<EntityAnnotation>,
}

impl AnnotationLayer {
    /// Create an empty, signed layer for a document.
    pub fn new(
        document_id: impl Into<String>,
        app: impl Into<String>,
        parameters: IndexMap<String, String>,
    ) -> Self {
        Self {
            id: format!("layer-{}", Uuid::new_v4()),
            document_id: document_id.into(),
            app: app.into(),
            parameters,
            created_at: Utc::now(),
            annotations: Vec::new(),
        }
    }

    /// Append a normalized mention as an annotation record.
    pub fn add_mention(&mut self, mention: NormalizedMention) -> &EntityAnnotation {
        let annotation = EntityAnnotation {
            id: format!("ne_{}", self.annotations.len()),
            start: mention.start,
            end: mention.end,
            category: mention.category,
            text: mention.text,
            grounding: mention.grounding,
        };
        self.annotations.push(annotation);
        self.annotations.last().expect("annotation just pushed")
    }

    /// Number of annotations in the layer.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the layer holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// An in-memory document collection: documents plus attached layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCollection {
    /// Source documents, in processing order.
    pub documents: Vec<TextDocument>,

    /// Annotation layers produced by pipeline runs.
    #[serde(default)]
    pub layers: Vec<AnnotationLayer>,
}

impl DocumentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, builder-style.
    pub fn with_document(mut self, document: TextDocument) -> Self {
        self.documents.push(document);
        self
    }

    /// Add a document.
    pub fn add_document(&mut self, document: TextDocument) {
        self.documents.push(document);
    }

    /// Attach a layer.
    pub fn add_layer(&mut self, layer: AnnotationLayer) {
        self.layers.push(layer);
    }

    /// Layers attached to a given document.
    pub fn layers_for<'a>(
        &'a self,
        document_id: &'a str,
    ) -> impl Iterator<Item = &'a AnnotationLayer> + 'a {
        self.layers
            .iter()
            .filter(move |layer| layer.document_id == document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_text_detection() {
        let empty = TextDocument::new("d1", "   \n");
        assert!(!empty.has_text());

        let doc = TextDocument::new("d2", "Paris is in France.");
        assert!(doc.has_text());
        assert_eq!(doc.char_len(), 19);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        let doc = TextDocument::new("d1", "Zürich");
        assert_eq!(doc.char_len(), 6);
        assert_eq!(doc.text.len(), 7);
    }

    #[test]
    fn layer_signs_before_annotations() {
        let mut parameters = IndexMap::new();
        parameters.insert("confidence".to_string(), "0.5".to_string());

        let layer = AnnotationLayer::new("d1", "linking/0.1.0", parameters);
        assert_eq!(layer.document_id, "d1");
        assert_eq!(layer.app, "linking/0.1.0");
        assert_eq!(layer.parameters.get("confidence").unwrap(), "0.5");
        assert!(layer.is_empty());
    }

    #[test]
    fn annotation_ids_are_layer_scoped() {
        let mut layer = AnnotationLayer::new("d1", "app", IndexMap::new());
        let mention = NormalizedMention {
            text: "Paris".to_string(),
            start: 0,
            end: 5,
            category: Category::Location,
            grounding: Vec::new(),
        };
        let first = layer.add_mention(mention.clone()).id.clone();
        let second = layer.add_mention(mention).id.clone();
        assert_eq!(first, "ne_0");
        assert_eq!(second, "ne_1");
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn collection_roundtrips_through_json() {
        let mut collection = DocumentCollection::new()
            .with_document(TextDocument::new("d1", "Paris is in France."));
        let mut layer = AnnotationLayer::new("d1", "app", IndexMap::new());
        layer.add_mention(NormalizedMention {
            text: "Paris".to_string(),
            start: 0,
            end: 5,
            category: Category::Location,
            grounding: vec!["http://dbpedia.org/resource/Paris".to_string()],
        });
        collection.add_layer(layer);

        let json = serde_json::to_string(&collection).unwrap();
        let restored: DocumentCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.documents.len(), 1);
        assert_eq!(restored.layers.len(), 1);
        assert_eq!(restored.layers_for("d1").count(), 1);
        assert_eq!(restored.layers[0].annotations[0].category, Category::Location);
    }
}
