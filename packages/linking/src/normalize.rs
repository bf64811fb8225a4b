//! Two-stage mention normalization.
//!
//! Stage one is pure: spans and categories are computed from the raw
//! records alone. Stage two performs the grounding-resolution network
//! calls. Keeping the stages separate means a resolution failure can
//! never corrupt already-computed offset or category data, and tests
//! can exercise parsing without a resolver.

use tracing::{debug, warn};

use crate::classify::{classify_tags, split_type_tags};
use crate::grounding::GroundingResolver;
use crate::types::mention::{Category, NormalizedMention, RawMention};

/// Stage one: compute spans and categories for a batch of raw mentions.
///
/// Every raw mention with a non-empty surface form yields exactly one
/// normalized mention; grounding is seeded with the canonical URI (or
/// left empty for un-disambiguated mentions).
pub fn parse_mentions(raws: &[RawMention]) -> Vec<NormalizedMention> {
    let mut mentions = Vec::with_capacity(raws.len());
    for raw in raws {
        if raw.surface_form.is_empty() {
            debug!(offset = raw.offset, "skipping mention with empty surface form");
            continue;
        }
        mentions.push(parse_mention(raw));
    }
    mentions
}

/// Normalize one raw mention without resolving secondary groundings.
pub fn parse_mention(raw: &RawMention) -> NormalizedMention {
    let category = match raw.types.as_deref() {
        Some(tags) if !tags.is_empty() => classify_tags(&split_type_tags(tags)),
        _ => Category::Unclassified,
    };

    let grounding = match raw.uri.as_deref() {
        Some(uri) if !uri.is_empty() => vec![uri.to_string()],
        _ => Vec::new(),
    };

    NormalizedMention {
        text: raw.surface_form.clone(),
        start: raw.offset,
        end: raw.offset + raw.surface_form.chars().count(),
        category,
        grounding,
    }
}

/// Stage two: append secondary identifiers to every disambiguated mention.
///
/// The resolver is invoked only for mentions that carry a canonical URI.
/// A resolver failure is absorbed: the mention keeps `[uri]` alone and
/// the batch continues.
pub async fn resolve_groundings<R>(mentions: &mut [NormalizedMention], resolver: &R)
where
    R: GroundingResolver + ?Sized,
{
    for mention in mentions.iter_mut() {
        let Some(uri) = mention.canonical_uri().map(str::to_string) else {
            continue;
        };
        match resolver.resolve(&uri).await {
            Ok(identifiers) => mention.grounding.extend(identifiers),
            Err(e) => {
                warn!(uri = %uri, error = %e, "grounding resolution failed; keeping canonical URI only");
            }
        }
    }
}

/// Normalize a batch end to end: parse all mentions, then resolve groundings.
pub async fn normalize_mentions<R>(raws: &[RawMention], resolver: &R) -> Vec<NormalizedMention>
where
    R: GroundingResolver + ?Sized,
{
    let mut mentions = parse_mentions(raws);
    resolve_groundings(&mut mentions, resolver).await;
    mentions
}
