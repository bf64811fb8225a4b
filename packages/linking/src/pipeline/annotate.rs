//! Collection annotation: the per-document orchestration loop.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use spotlight_client::AnnotateOptions;

use crate::error::Result;
use crate::grounding::GroundingResolver;
use crate::linker::LinkingService;
use crate::normalize::normalize_mentions;
use crate::types::document::{AnnotationLayer, DocumentCollection};

/// Configuration for an annotation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tuning options forwarded to the linking service and recorded on
    /// every produced layer.
    pub options: AnnotateOptions,

    /// Identity of the producing pipeline, recorded on every layer.
    pub app: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            options: AnnotateOptions::default(),
            app: format!("linking/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PipelineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the annotate options.
    pub fn with_options(mut self, options: AnnotateOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the producing app identity.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    /// The parameter map recorded on produced layers.
    fn layer_parameters(&self) -> IndexMap<String, String> {
        self.options.to_params().into_iter().collect()
    }
}

/// Result of an annotation run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Documents that received an annotation layer.
    pub documents_processed: usize,

    /// Documents skipped for having no linkable text.
    pub documents_skipped: usize,

    /// Total mentions emitted across all layers.
    pub mentions_emitted: usize,

    /// Documents that failed, with the failure reason.
    pub failed_documents: Vec<(String, String)>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every qualifying document was processed.
    pub fn is_success(&self) -> bool {
        self.failed_documents.is_empty()
    }
}

/// Annotate every text-bearing document in the collection.
///
/// Documents are processed independently, in collection order, one at a
/// time. A document-level failure (malformed response) is recorded and
/// the run continues; the linking service becoming unreachable aborts
/// the whole run. Every successfully processed document gets a layer,
/// even when zero entities were found: the layer is created and signed
/// before any mention is added, so consumers can distinguish "processed,
/// found nothing" from "not processed".
pub async fn annotate_collection<L, R>(
    collection: &mut DocumentCollection,
    config: &PipelineConfig,
    linker: &L,
    resolver: &R,
) -> Result<RunReport>
where
    L: LinkingService + ?Sized,
    R: GroundingResolver + ?Sized,
{
    let mut report = RunReport::new();

    // The probe failing here means the service never started; nothing
    // has been processed yet.
    linker.ensure_ready().await?;

    let documents: Vec<(String, String, usize)> = collection
        .documents
        .iter()
        .map(|doc| (doc.id.clone(), doc.text.clone(), doc.char_len()))
        .collect();

    info!(documents = documents.len(), app = %config.app, "annotation run starting");

    for (doc_id, text, char_len) in documents {
        if text.trim().is_empty() {
            debug!(doc_id = %doc_id, "document has no linkable text; skipping");
            report.documents_skipped += 1;
            continue;
        }

        debug!(doc_id = %doc_id, chars = char_len, "annotating document");

        let raws = match linker.annotate(&text, &config.options).await {
            Ok(raws) => raws,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(doc_id = %doc_id, error = %e, "document failed; continuing with next");
                report.failed_documents.push((doc_id, e.to_string()));
                continue;
            }
        };

        let mut layer = AnnotationLayer::new(&doc_id, &config.app, config.layer_parameters());
        debug!(doc_id = %doc_id, layer_id = %layer.id, raw_mentions = raws.len(), "created annotation layer");

        let mentions = normalize_mentions(&raws, resolver).await;
        for mention in mentions {
            if mention.end > char_len {
                warn!(
                    doc_id = %doc_id,
                    start = mention.start,
                    end = mention.end,
                    chars = char_len,
                    "mention span exceeds document length"
                );
            }
            layer.add_mention(mention);
            report.mentions_emitted += 1;
        }

        info!(
            doc_id = %doc_id,
            layer_id = %layer.id,
            annotations = layer.len(),
            "document annotated"
        );
        collection.add_layer(layer);
        report.documents_processed += 1;
    }

    info!(
        processed = report.documents_processed,
        skipped = report.documents_skipped,
        failed = report.failed_documents.len(),
        mentions = report.mentions_emitted,
        "annotation run complete"
    );

    Ok(report)
}
