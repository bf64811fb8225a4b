//! Coarse category classification.
//!
//! The primary path maps the linking service's structured type tags
//! onto the fixed category set. The fallback path, for services that
//! return no structured tags, scrapes the concept's canonical page for
//! its short type label. Classification failure is never fatal: every
//! degraded path lands on [`Category::Unclassified`].

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{LinkingError, Result};
use crate::types::mention::Category;

/// Priority-ordered mapping from tag sets to coarse categories.
///
/// First matching row wins. The ordering is a deliberate tie-break: an
/// entity tagged both person and organization classifies as person.
const CATEGORY_TABLE: [(Category, &[&str]); 6] = [
    (
        Category::Person,
        &["dbpedia:person", "schema:person", "dbpedia:fictionalcharacter"],
    ),
    (
        Category::Location,
        &["dbpedia:place", "dbpedia:location", "schema:place"],
    ),
    (
        Category::Organization,
        &["dbpedia:organisation", "schema:organization"],
    ),
    (Category::Product, &["schema:product"]),
    (Category::Event, &["dbpedia:event", "schema:event"]),
    (Category::Title, &["dbpedia:work", "schema:creativework"]),
];

/// Split a comma-delimited tag string into lowercase tags.
pub fn split_type_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Classify a set of lowercase type tags into a coarse category.
///
/// Deterministic and order-sensitive: the table is scanned top to
/// bottom and the first category with any member tag present wins. No
/// intersection at all yields [`Category::Unclassified`].
pub fn classify_tags(tags: &[String]) -> Category {
    for (category, members) in CATEGORY_TABLE {
        if tags.iter().any(|tag| members.contains(&tag.as_str())) {
            return category;
        }
    }
    Category::Unclassified
}

/// Fallback classifier that scrapes a concept's canonical page.
///
/// Some linking services omit structured type tags; their concept pages
/// still carry a short "An Entity of Type" label. The scraped label is
/// normalized through the same fixed table so the closed category set
/// holds; an unmapped label, unreachable page, or absent markup all
/// degrade to [`Category::Unclassified`].
pub struct PageTypeScraper {
    client: reqwest::Client,
    label_pattern: Regex,
}

impl Default for PageTypeScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTypeScraper {
    /// Create a scraper with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            label_pattern: Regex::new(
                r"An\s+Entity\s+of\s+Type\s*:\s*(?:<[^>]*>\s*)*([A-Za-z][A-Za-z ]*)",
            )
            .expect("invalid label pattern"),
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Classify a concept by scraping its canonical page.
    pub async fn classify_from_page(&self, concept_uri: &str) -> Category {
        match self.fetch_label(concept_uri).await {
            Ok(Some(label)) => {
                let category = self.classify_label(&label);
                debug!(uri = %concept_uri, label = %label, category = %category, "scraped type label");
                category
            }
            Ok(None) => {
                debug!(uri = %concept_uri, "concept page has no type label");
                Category::Unclassified
            }
            Err(e) => {
                warn!(uri = %concept_uri, error = %e, "page scrape failed; leaving category empty");
                Category::Unclassified
            }
        }
    }

    /// Map a scraped label through the fixed category table.
    pub fn classify_label(&self, label: &str) -> Category {
        let label = label.trim().to_lowercase();
        let tags = vec![format!("dbpedia:{}", label), format!("schema:{}", label)];
        classify_tags(&tags)
    }

    /// Extract the type label from the known HTML region, if present.
    pub fn extract_label(&self, html: &str) -> Option<String> {
        self.label_pattern
            .captures(html)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|label| !label.is_empty())
    }

    async fn fetch_label(&self, concept_uri: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(concept_uri)
            .send()
            .await
            .map_err(|e| LinkingError::ClassificationUnavailable {
                reason: format!("concept page unreachable: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkingError::ClassificationUnavailable {
                reason: format!("concept page returned HTTP {}", status),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| LinkingError::ClassificationUnavailable {
                reason: format!("concept page unreadable: {}", e),
            })?;

        Ok(self.extract_label(&html))
    }
}
