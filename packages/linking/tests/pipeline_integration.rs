//! Integration tests for the full annotation pipeline.
//!
//! These tests drive the whole flow over mocks:
//! 1. Submit document text to the linking service
//! 2. Normalize raw mentions (spans, category, grounding)
//! 3. Emit signed annotation layers into the collection

use linking::{
    annotate_collection, testing::{MockLinker, MockResolver}, Category, DocumentCollection,
    PipelineConfig, RawMention, TextDocument,
};

const PARIS_TEXT: &str = "I went to Paris last year.";
const PARIS_URI: &str = "http://dbpedia.org/resource/Paris";

/// Helper to build a collection from (id, text) pairs.
fn collection_of(documents: &[(&str, &str)]) -> DocumentCollection {
    let mut collection = DocumentCollection::new();
    for (id, text) in documents {
        collection.add_document(TextDocument::new(*id, *text));
    }
    collection
}

fn paris_mention() -> RawMention {
    RawMention::new("Paris", 10)
        .with_uri(PARIS_URI)
        .with_types("Schema:Place,DBpedia:Place,DBpedia:PopulatedPlace")
}

#[tokio::test]
async fn scenario_full_annotation_with_grounding() {
    let mut collection = collection_of(&[("d1", PARIS_TEXT)]);
    let linker = MockLinker::new().with_response(PARIS_TEXT, vec![paris_mention()]);
    let resolver = MockResolver::new().with_identifiers(
        PARIS_URI,
        vec![
            "http://www.wikidata.org/entity/Q90".to_string(),
            "http://www.wikidata.org/entity/Q1524".to_string(),
        ],
    );

    let report = annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.documents_processed, 1);
    assert_eq!(report.mentions_emitted, 1);

    let layer = collection.layers_for("d1").next().unwrap();
    let annotation = &layer.annotations[0];
    assert_eq!(annotation.text, "Paris");
    assert_eq!(annotation.start, 10);
    assert_eq!(annotation.end, 15);
    assert_eq!(annotation.category, Category::Location);
    assert_eq!(annotation.grounding[0], PARIS_URI);
    assert_eq!(annotation.grounding.len(), 3);
}

#[tokio::test]
async fn scenario_undisambiguated_mention_degrades_cleanly() {
    let text = "Some obscure thing happened.";
    let mut collection = collection_of(&[("d1", text)]);
    let linker =
        MockLinker::new().with_response(text, vec![RawMention::new("obscure thing", 5)]);
    let resolver = MockResolver::new();

    annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap();

    let annotation = &collection.layers_for("d1").next().unwrap().annotations[0];
    assert_eq!(annotation.category, Category::Unclassified);
    assert_eq!(annotation.category.as_str(), "");
    assert!(annotation.grounding.is_empty());

    // No URI, so the knowledge graph was never consulted.
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn scenario_malformed_response_skips_document_continues_run() {
    let mut collection = collection_of(&[
        ("broken", "text the service chokes on"),
        ("fine", PARIS_TEXT),
    ]);
    let linker = MockLinker::new()
        .with_invalid_response("text the service chokes on")
        .with_response(PARIS_TEXT, vec![paris_mention()]);
    let resolver = MockResolver::new();

    let report = annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed_documents.len(), 1);
    assert_eq!(report.failed_documents[0].0, "broken");

    // The broken document has no layer; the later document still does.
    assert_eq!(collection.layers_for("broken").count(), 0);
    assert_eq!(collection.layers_for("fine").count(), 1);
}

#[tokio::test]
async fn scenario_grounding_timeout_keeps_canonical_uri() {
    let mut collection = collection_of(&[("d1", PARIS_TEXT)]);
    let linker = MockLinker::new().with_response(PARIS_TEXT, vec![paris_mention()]);
    let resolver = MockResolver::new().with_failure(PARIS_URI);

    let report = annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap();

    // The mention is still produced, grounded by the canonical URI alone.
    assert!(report.is_success());
    let annotation = &collection.layers_for("d1").next().unwrap().annotations[0];
    assert_eq!(annotation.grounding, vec![PARIS_URI.to_string()]);
    assert_eq!(annotation.category, Category::Location);
}

#[tokio::test]
async fn scenario_unreachable_service_aborts_run() {
    let mut collection = collection_of(&[("d1", PARIS_TEXT), ("d2", "More text.")]);
    let linker = MockLinker::new().unavailable();
    let resolver = MockResolver::new();

    let err = annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap_err();

    assert!(err.is_fatal());
    assert!(collection.layers.is_empty());
    assert_eq!(linker.call_count(), 0);
}

#[tokio::test]
async fn layers_record_identity_and_options() {
    let mut collection = collection_of(&[("d1", PARIS_TEXT)]);
    let linker = MockLinker::new();
    let resolver = MockResolver::new();
    let config = PipelineConfig::default().with_app("nel-pipeline/test");

    annotate_collection(&mut collection, &config, &linker, &resolver)
        .await
        .unwrap();

    let layer = collection.layers_for("d1").next().unwrap();
    assert_eq!(layer.app, "nel-pipeline/test");
    assert_eq!(layer.parameters.get("confidence").unwrap(), "0.5");
    assert_eq!(layer.parameters.get("support").unwrap(), "0");
    assert_eq!(layer.parameters.get("policy").unwrap(), "whitelist");
}

#[tokio::test]
async fn documents_process_in_collection_order() {
    let mut collection = collection_of(&[("a", "First text."), ("b", "Second text."), ("c", "Third text.")]);
    let linker = MockLinker::new();
    let resolver = MockResolver::new();

    annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await
    .unwrap();

    assert_eq!(
        linker.calls(),
        vec!["First text.", "Second text.", "Third text."]
    );
}
