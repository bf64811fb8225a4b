//! Annotation pipeline - the per-document orchestration loop.
//!
//! The pipeline drives, per document: submit to the linking service →
//! normalize each raw mention (spans, category, grounding) → emit a
//! signed annotation layer. Document failures are independent; the
//! linking service becoming unreachable is fatal to the run.

pub mod annotate;

pub use annotate::{annotate_collection, PipelineConfig, RunReport};
