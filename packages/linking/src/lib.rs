//! Named-Entity Linking Annotation Pipeline
//!
//! Forwards document text to an external entity-linking service,
//! normalizes the returned mentions (character spans, coarse semantic
//! category, knowledge-graph grounding), and attaches the results to
//! each source document as a signed annotation layer.
//!
//! # Design
//!
//! - The service seams ([`LinkingService`], [`GroundingResolver`]) are
//!   traits, so the pipeline runs against mocks in tests and against
//!   Spotlight + a SPARQL endpoint in production.
//! - Normalization is two-stage: parse all mentions first (pure), then
//!   resolve groundings (network). Resolution failures can never corrupt
//!   parsed spans or categories.
//! - Failure isolation follows the span of the failure: a grounding or
//!   classification failure degrades one mention, a malformed response
//!   fails one document, and only an unreachable linking service aborts
//!   the run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use linking::{
//!     annotate_collection, DocumentCollection, PipelineConfig,
//!     SparqlResolver, SpotlightLinker, TextDocument,
//! };
//! use spotlight_client::SpotlightClient;
//!
//! let mut collection = DocumentCollection::new()
//!     .with_document(TextDocument::new("d1", "I went to Paris last year."));
//!
//! let linker = SpotlightLinker::new(SpotlightClient::new("localhost:2222"));
//! let resolver = SparqlResolver::new();
//!
//! let report = annotate_collection(
//!     &mut collection,
//!     &PipelineConfig::default(),
//!     &linker,
//!     &resolver,
//! )
//! .await?;
//! ```
//!
//! # Modules
//!
//! - [`types`] - mention and document-container data types
//! - [`classify`] - coarse category classification (tags + scrape fallback)
//! - [`grounding`] - knowledge-graph same-as resolution
//! - [`normalize`] - two-stage mention normalization
//! - [`linker`] - linking service seam and Spotlight adapter
//! - [`pipeline`] - the per-document orchestration loop
//! - [`testing`] - mock implementations for testing

pub mod classify;
pub mod error;
pub mod grounding;
pub mod linker;
pub mod normalize;
pub mod pipeline;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{LinkingError, Result};
pub use types::{
    document::{AnnotationLayer, DocumentCollection, EntityAnnotation, TextDocument},
    mention::{Category, NormalizedMention, RawMention},
};

// Re-export pipeline components
pub use classify::{classify_tags, split_type_tags, PageTypeScraper};
pub use grounding::{GroundingResolver, IriMode, SparqlConfig, SparqlResolver};
pub use linker::{LinkingService, SpotlightLinker};
pub use normalize::{normalize_mentions, parse_mention, parse_mentions, resolve_groundings};
pub use pipeline::{annotate_collection, PipelineConfig, RunReport};

// Re-export the service tuning options used across the seam
pub use spotlight_client::{AnnotateOptions, FilterPolicy};
