//! Tag vocabulary and tagged tokens.
//!
//! Tags are open-ended strings drawn from the Sinhala tagset (`NNC`, `NNP`,
//! `VFM`, `POST`, ...). A tag may additionally carry exactly one entity suffix
//! (`NNP_PERSON`, `NNC_LOC`, ...) once the entity augmentor has seen it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::EntityCategory;

/// Sentinel for tokens missing from the POS dictionary.
pub const UNKNOWN_TAG: &str = "UNK";
/// Postposition; also the tag that marks reported-speech boundaries.
pub const POSTPOSITION_TAG: &str = "POST";
/// Generic proper noun.
pub const PROPER_NOUN_TAG: &str = "NNP";

/// A grammatical tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_TAG.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_TAG
    }

    pub fn is_postposition(&self) -> bool {
        self.0 == POSTPOSITION_TAG
    }

    /// The entity category carried by the suffix, if any.
    pub fn entity(&self) -> Option<EntityCategory> {
        let (_, suffix) = self.0.rsplit_once('_')?;
        EntityCategory::from_suffix(suffix)
    }

    /// The tag without its entity suffix.
    pub fn base(&self) -> &str {
        match self.0.rsplit_once('_') {
            Some((base, suffix)) if EntityCategory::from_suffix(suffix).is_some() => base,
            _ => &self.0,
        }
    }

    pub fn has_entity_suffix(&self) -> bool {
        self.entity().is_some()
    }

    pub fn has_suffix_for(&self, category: EntityCategory) -> bool {
        self.0
            .strip_suffix(category.suffix())
            .is_some_and(|rest| rest.ends_with('_'))
    }

    pub fn is_proper_noun(&self) -> bool {
        self.0.starts_with(PROPER_NOUN_TAG)
    }

    /// Specialize this tag for an entity category.
    ///
    /// `UNK` becomes `NNP_<SUFFIX>`; any other tag gets the suffix on its
    /// base, so a different entity suffix is replaced rather than stacked.
    pub fn with_entity(&self, category: EntityCategory) -> Tag {
        if self.has_suffix_for(category) {
            return self.clone();
        }
        let base = match self.base() {
            UNKNOWN_TAG => PROPER_NOUN_TAG,
            base => base,
        };
        Tag(format!("{base}_{}", category.suffix()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::new(value)
    }
}

/// A token paired with its tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: Tag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: impl Into<Tag>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.text, self.tag)
    }
}

/// Join token texts with single spaces.
pub fn join_text<'a>(tokens: impl IntoIterator<Item = &'a TaggedToken>) -> String {
    tokens
        .into_iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_suffix_is_parsed_from_the_last_component() {
        let tag = Tag::new("NNP_PERSON");
        assert_eq!(tag.entity(), Some(EntityCategory::Persons));
        assert_eq!(tag.base(), "NNP");
        assert!(tag.is_proper_noun());

        let plain = Tag::new("NNC");
        assert_eq!(plain.entity(), None);
        assert_eq!(plain.base(), "NNC");
    }

    #[test]
    fn unknown_tags_become_proper_nouns() {
        assert_eq!(
            Tag::unknown().with_entity(EntityCategory::Locations).as_str(),
            "NNP_LOC"
        );
        assert_eq!(
            Tag::new("NNC").with_entity(EntityCategory::Organizations).as_str(),
            "NNC_ORG"
        );
    }

    #[test]
    fn with_entity_is_idempotent() {
        let once = Tag::new("NNP").with_entity(EntityCategory::Events);
        let twice = once.with_entity(EntityCategory::Events);
        assert_eq!(once, twice);
    }

    #[test]
    fn with_entity_replaces_a_different_suffix() {
        let person = Tag::new("NNP_PERSON");
        assert_eq!(person.with_entity(EntityCategory::Locations).as_str(), "NNP_LOC");
        assert_eq!(
            Tag::new("NNC_EVENT").with_entity(EntityCategory::Organizations).as_str(),
            "NNC_ORG"
        );
    }

    #[test]
    fn suffix_check_requires_separator() {
        // "XLOC" is not a LOC-suffixed tag.
        assert!(!Tag::new("XLOC").has_suffix_for(EntityCategory::Locations));
        assert!(Tag::new("NNC_LOC").has_suffix_for(EntityCategory::Locations));
    }
}
