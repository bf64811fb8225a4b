//! Data types for the linking pipeline.
//!
//! - [`mention`] - raw service records and normalized mentions
//! - [`document`] - document collection boundary types

pub mod document;
pub mod mention;

pub use document::{AnnotationLayer, DocumentCollection, EntityAnnotation, TextDocument};
pub use mention::{Category, NormalizedMention, RawMention};
