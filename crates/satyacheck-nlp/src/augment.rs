//! Merge NER output into POS tags.
//!
//! A token whose text equals a whitespace-delimited component of some entity
//! string is re-tagged with that entity's suffix (`NNP` + PERSON →
//! `NNP_PERSON`, `UNK` + LOC → `NNP_LOC`).

use std::collections::HashMap;

use crate::entities::{EntityCategory, EntityCollection};
use crate::tags::TaggedToken;

/// Component word → entity category. Categories are merged in
/// [`EntityCategory::AUGMENT_ORDER`]; the last category to claim a word wins.
fn word_categories(entities: &EntityCollection) -> HashMap<&str, EntityCategory> {
    let mut map = HashMap::new();
    for category in EntityCategory::AUGMENT_ORDER {
        for entity in entities.get(category) {
            for part in entity.split_whitespace() {
                map.insert(part, category);
            }
        }
    }
    map
}

/// Return a new sequence with entity-specialized tags.
pub fn augment_with_entities(tokens: &[TaggedToken], entities: &EntityCollection) -> Vec<TaggedToken> {
    let categories = word_categories(entities);
    tokens
        .iter()
        .map(|token| match categories.get(token.text.as_str()) {
            Some(category) => TaggedToken {
                text: token.text.clone(),
                tag: token.tag.with_entity(*category),
            },
            None => token.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|(w, t)| TaggedToken::new(*w, *t)).collect()
    }

    #[test]
    fn multi_word_entities_tag_every_component() {
        let input = tokens(&[("රනිල්", "NNP"), ("වික්‍රමසිංහ", "UNK"), ("ගියා", "VFM")]);
        let entities = EntityCollection::default()
            .with(EntityCategory::Persons, &["රනිල් වික්‍රමසිංහ"]);

        let out = augment_with_entities(&input, &entities);
        assert_eq!(out[0].tag.as_str(), "NNP_PERSON");
        assert_eq!(out[1].tag.as_str(), "NNP_PERSON");
        assert_eq!(out[2].tag.as_str(), "VFM");
    }

    #[test]
    fn person_beats_location_for_shared_components() {
        let input = tokens(&[("කොළඹ", "NNP")]);
        let entities = EntityCollection::default()
            .with(EntityCategory::Locations, &["කොළඹ"])
            .with(EntityCategory::Persons, &["කොළඹ"])
            .with(EntityCategory::Events, &["කොළඹ"]);

        let out = augment_with_entities(&input, &entities);
        assert_eq!(out[0].tag.as_str(), "NNP_PERSON");
    }

    #[test]
    fn organization_beats_location_and_event() {
        let input = tokens(&[("ලංකා", "NNP")]);
        let entities = EntityCollection::default()
            .with(EntityCategory::Events, &["ලංකා කුසලාන"])
            .with(EntityCategory::Organizations, &["ලංකා ක්‍රිකට්"])
            .with(EntityCategory::Locations, &["ශ්‍රී ලංකා"]);

        let out = augment_with_entities(&input, &entities);
        assert_eq!(out[0].tag.as_str(), "NNP_ORG");
    }

    #[test]
    fn reapplying_is_a_no_op() {
        let input = tokens(&[("හමාස්", "UNK")]);
        let entities = EntityCollection::default().with(EntityCategory::Organizations, &["හමාස්"]);

        let once = augment_with_entities(&input, &entities);
        let twice = augment_with_entities(&once, &entities);
        assert_eq!(once, twice);
        assert_eq!(twice[0].tag.as_str(), "NNP_ORG");
    }

    #[test]
    fn later_entities_replace_an_earlier_suffix() {
        let input = tokens(&[("ගාලු", "NNP_PERSON")]);
        let entities = EntityCollection::default().with(EntityCategory::Locations, &["ගාලු"]);
        let out = augment_with_entities(&input, &entities);
        assert_eq!(out[0].tag.as_str(), "NNP_LOC");
    }

    #[test]
    fn input_is_not_mutated() {
        let input = tokens(&[("ගාසා", "NNP")]);
        let entities = EntityCollection::default().with(EntityCategory::Locations, &["ගාසා"]);
        let _ = augment_with_entities(&input, &entities);
        assert_eq!(input[0].tag.as_str(), "NNP");
    }
}
