//! Named-entity collections and the entity-extraction seam.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity categories produced by the NER service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Persons,
    Locations,
    Events,
    Organizations,
}

impl EntityCategory {
    /// Order used when scoring and reporting per-category results.
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Persons,
        EntityCategory::Locations,
        EntityCategory::Events,
        EntityCategory::Organizations,
    ];

    /// Merge order for tag augmentation. Later categories overwrite earlier
    /// ones for the same token, so the effective priority is
    /// PERSON > ORG > LOC > EVENT.
    pub const AUGMENT_ORDER: [EntityCategory; 4] = [
        EntityCategory::Events,
        EntityCategory::Locations,
        EntityCategory::Organizations,
        EntityCategory::Persons,
    ];

    /// Collection key as used in NER payloads (`"persons"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            EntityCategory::Persons => "persons",
            EntityCategory::Locations => "locations",
            EntityCategory::Events => "events",
            EntityCategory::Organizations => "organizations",
        }
    }

    /// Tag suffix marker.
    pub fn suffix(self) -> &'static str {
        match self {
            EntityCategory::Persons => "PERSON",
            EntityCategory::Locations => "LOC",
            EntityCategory::Events => "EVENT",
            EntityCategory::Organizations => "ORG",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "PERSON" => Some(EntityCategory::Persons),
            "LOC" => Some(EntityCategory::Locations),
            "EVENT" => Some(EntityCategory::Events),
            "ORG" => Some(EntityCategory::Organizations),
            _ => None,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Entity strings grouped by category, in the order the extractor produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCollection {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
}

impl EntityCollection {
    pub fn get(&self, category: EntityCategory) -> &[String] {
        match category {
            EntityCategory::Persons => &self.persons,
            EntityCategory::Locations => &self.locations,
            EntityCategory::Events => &self.events,
            EntityCategory::Organizations => &self.organizations,
        }
    }

    pub fn get_mut(&mut self, category: EntityCategory) -> &mut Vec<String> {
        match category {
            EntityCategory::Persons => &mut self.persons,
            EntityCategory::Locations => &mut self.locations,
            EntityCategory::Events => &mut self.events,
            EntityCategory::Organizations => &mut self.organizations,
        }
    }

    pub fn with(mut self, category: EntityCategory, values: &[&str]) -> Self {
        self.get_mut(category)
            .extend(values.iter().map(|v| v.to_string()));
        self
    }

    pub fn total(&self) -> usize {
        EntityCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntityExtractionError {
    #[error("entity extraction service failed: {0}")]
    Service(String),
    #[error("entity extraction returned an invalid payload: {0}")]
    InvalidResponse(String),
}

/// External named-entity recognizer.
pub trait EntityExtractor {
    fn extract_entities(&self, text: &str) -> Result<EntityCollection, EntityExtractionError>;
}

/// What to do when an external collaborator fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Surface the error to the caller.
    #[default]
    Propagate,
    /// Log and continue with the documented empty/zero value.
    Degrade,
}

/// Run the extractor, applying `policy` to failures.
pub fn extract_entities_with_policy(
    extractor: &dyn EntityExtractor,
    text: &str,
    policy: FailurePolicy,
) -> Result<EntityCollection, EntityExtractionError> {
    match extractor.extract_entities(text) {
        Ok(entities) => Ok(entities),
        Err(err) => match policy {
            FailurePolicy::Propagate => Err(err),
            FailurePolicy::Degrade => {
                tracing::warn!(error = %err, "entity extraction failed; continuing with no entities");
                Ok(EntityCollection::default())
            }
        },
    }
}
