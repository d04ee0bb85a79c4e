//! Read-only trusted-news lookups.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use satyacheck_nlp::EntityCategory;

/// One trusted article as returned by a category query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustedContent {
    pub full_text: String,
    pub title: String,
    pub url: String,
    /// Publisher name; empty when the store does not record one.
    #[serde(default)]
    pub publisher: String,
}

impl TrustedContent {
    pub fn new(
        full_text: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            full_text: full_text.into(),
            title: title.into(),
            url: url.into(),
            publisher: String::new(),
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("trusted store query failed: {0}")]
    Query(String),
    #[error("trusted store unavailable: {0}")]
    Unavailable(String),
}

/// Knowledge-base queries used by the scorer. Results are in store order.
pub trait TrustedStore {
    /// Trusted articles filed under `category` (a category or subcategory id).
    fn trusted_contents(&self, category: &str) -> Result<Vec<TrustedContent>, StoreError>;

    /// Distinct trusted publisher names.
    fn trusted_publishers(&self) -> Result<Vec<String>, StoreError>;

    /// Verified entity names of `kind` mentioned by trusted articles in `subcategory`.
    fn verified_entities(
        &self,
        subcategory: &str,
        kind: EntityCategory,
    ) -> Result<Vec<String>, StoreError>;
}

/// Store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrustedStore {
    contents: Vec<(String, TrustedContent)>,
    publishers: Vec<String>,
    entities: HashMap<(String, EntityCategory), Vec<String>>,
}

impl InMemoryTrustedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, category: &str, content: TrustedContent) -> Self {
        self.contents.push((category.to_string(), content));
        self
    }

    pub fn with_publisher(mut self, publisher: &str) -> Self {
        self.publishers.push(publisher.to_string());
        self
    }

    pub fn with_entities(mut self, subcategory: &str, kind: EntityCategory, names: &[&str]) -> Self {
        self.entities
            .entry((subcategory.to_string(), kind))
            .or_default()
            .extend(names.iter().map(|n| n.to_string()));
        self
    }
}

impl TrustedStore for InMemoryTrustedStore {
    fn trusted_contents(&self, category: &str) -> Result<Vec<TrustedContent>, StoreError> {
        Ok(self
            .contents
            .iter()
            .filter(|(c, _)| c == category)
            .map(|(_, content)| content.clone())
            .collect())
    }

    fn trusted_publishers(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.publishers.clone())
    }

    fn verified_entities(
        &self,
        subcategory: &str,
        kind: EntityCategory,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entities
            .get(&(subcategory.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_category_in_insertion_order() {
        let store = InMemoryTrustedStore::new()
            .with_content("sports", TrustedContent::new("a", "A", "https://a.lk/1"))
            .with_content("politics", TrustedContent::new("b", "B", "https://b.lk/1"))
            .with_content("sports", TrustedContent::new("c", "C", "https://c.lk/1"));

        let sports = store.trusted_contents("sports").expect("query");
        assert_eq!(sports.len(), 2);
        assert_eq!(sports[0].title, "A");
        assert_eq!(sports[1].title, "C");
        assert!(store.trusted_contents("health").expect("query").is_empty());
    }

    #[test]
    fn verified_entities_are_keyed_by_subcategory_and_kind() {
        let store = InMemoryTrustedStore::new()
            .with_entities("cricket", EntityCategory::Persons, &["ඇන්ජලෝ මැතිව්ස්"]);
        assert_eq!(
            store
                .verified_entities("cricket", EntityCategory::Persons)
                .expect("query"),
            vec!["ඇන්ජලෝ මැතිව්ස්".to_string()]
        );
        assert!(store
            .verified_entities("cricket", EntityCategory::Locations)
            .expect("query")
            .is_empty());
    }
}
