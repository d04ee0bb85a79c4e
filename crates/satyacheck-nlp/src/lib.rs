//! Sinhala triple extraction.
//!
//! The pipeline is a chain of pure transforms over one sentence:
//!
//! 1. [`PosLexicon`] tags whitespace tokens from a static dictionary.
//! 2. [`augment_with_entities`] folds named-entity lists into the tags
//!    (`NNP` → `NNP_PERSON`).
//! 3. [`ChunkGrammar::chunk`] groups tags into NP / VP phrases.
//! 4. [`split_clauses`] looks for a reported-speech boundary (`බව`).
//! 5. [`select_triples`] picks subject, verb and object.
//!
//! [`TripleExtractor`] wires these together. Static resources are loaded once
//! and passed in; nothing here holds global state.

pub mod augment;
pub mod chunk;
pub mod clause;
pub mod entities;
pub mod grammar;
pub mod lexicon;
pub mod preprocess;
pub mod tags;
pub mod triples;

pub use augment::augment_with_entities;
pub use chunk::{ChunkNode, ChunkTree, Phrase};
pub use clause::{find_boundary, split_clauses, ClauseSplit, REPORTED_SPEECH_MARKERS};
pub use entities::{
    extract_entities_with_policy, EntityCategory, EntityCollection, EntityExtractionError,
    EntityExtractor, FailurePolicy,
};
pub use grammar::{ChunkGrammar, GrammarLoadError, GrammarParseError, PhraseKind};
pub use lexicon::{LexiconError, PosLexicon};
pub use preprocess::{PreprocessOptions, PreprocessorResources, SinhalaPreprocessor};
pub use tags::{Tag, TaggedToken};
pub use triples::{select_triples, ClauseObject, SelectionStrategy, Triple, TripleObject};

use serde::{Deserialize, Serialize};

/// Everything produced while extracting triples from one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub original_text: String,
    pub entities: EntityCollection,
    pub tagged: Vec<TaggedToken>,
    pub augmented: Vec<TaggedToken>,
    /// Bracketed tree of the whole sentence, empty for empty input.
    pub chunk_tree: String,
    pub strategy: Option<SelectionStrategy>,
    pub triples: Vec<Triple>,
}

impl ExtractionResult {
    fn empty(text: &str, entities: &EntityCollection) -> Self {
        Self {
            original_text: text.to_string(),
            entities: entities.clone(),
            ..Self::default()
        }
    }
}

/// POS dictionary plus chunk grammar.
#[derive(Debug, Clone)]
pub struct TripleExtractor {
    lexicon: PosLexicon,
    grammar: ChunkGrammar,
}

impl TripleExtractor {
    pub fn new(lexicon: PosLexicon, grammar: ChunkGrammar) -> Self {
        Self { lexicon, grammar }
    }

    pub fn lexicon(&self) -> &PosLexicon {
        &self.lexicon
    }

    pub fn grammar(&self) -> &ChunkGrammar {
        &self.grammar
    }

    /// Extract triples from raw or lightly cleaned text, using entities the
    /// caller already obtained for the same text.
    pub fn extract(&self, text: &str, entities: &EntityCollection) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::empty(text, entities);
        }

        let tagged = self.lexicon.tag_text(text);
        let augmented = augment_with_entities(&tagged, entities);
        self.extract_tagged(text, entities, tagged, augmented)
    }

    /// Extract from an already tagged (and possibly augmented) sequence.
    pub fn extract_from_tagged(&self, augmented: &[TaggedToken]) -> ExtractionResult {
        let text = tags::join_text(augmented);
        if augmented.is_empty() {
            return ExtractionResult::empty(&text, &EntityCollection::default());
        }
        self.extract_tagged(
            &text,
            &EntityCollection::default(),
            augmented.to_vec(),
            augmented.to_vec(),
        )
    }

    fn extract_tagged(
        &self,
        text: &str,
        entities: &EntityCollection,
        tagged: Vec<TaggedToken>,
        augmented: Vec<TaggedToken>,
    ) -> ExtractionResult {
        let tree = self.grammar.chunk(&augmented);
        let split = split_clauses(&self.grammar, &augmented);
        let (strategy, triples) = select_triples(&tree, split.as_ref());
        tracing::debug!(
            tokens = augmented.len(),
            strategy = ?strategy,
            triples = triples.len(),
            "triple extraction finished"
        );

        ExtractionResult {
            original_text: text.to_string(),
            entities: entities.clone(),
            tagged,
            augmented,
            chunk_tree: tree.to_string(),
            strategy,
            triples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TripleExtractor {
        let lexicon = PosLexicon::parse(
            "ජනාධිපති NNC\nරනිල් NNP\nගියා VFM\nබව POST\nඔහු PRP\nකීවා VFM\n",
        );
        TripleExtractor::new(lexicon, ChunkGrammar::sinhala().expect("grammar"))
    }

    #[test]
    fn empty_text_is_not_an_error() {
        let result = extractor().extract("   ", &EntityCollection::default());
        assert!(result.triples.is_empty());
        assert!(result.tagged.is_empty());
        assert_eq!(result.chunk_tree, "");
        assert_eq!(result.strategy, None);
    }

    #[test]
    fn entities_drive_subject_choice() {
        let entities = EntityCollection::default().with(EntityCategory::Persons, &["රනිල්"]);
        let result = extractor().extract("ජනාධිපති රනිල් ගියා", &entities);

        assert_eq!(result.tagged[1].tag.as_str(), "NNP");
        assert_eq!(result.augmented[1].tag.as_str(), "NNP_PERSON");
        assert_eq!(result.strategy, Some(SelectionStrategy::Flat));
        assert_eq!(result.triples.len(), 1);
        assert_eq!(result.triples[0].subject, "ජනාධිපති රනිල්");
        assert_eq!(
            result.chunk_tree,
            "(S (NP ජනාධිපති/NNC රනිල්/NNP_PERSON) (VP ගියා/VFM))"
        );
    }

    #[test]
    fn boundary_word_switches_strategy() {
        let result = extractor().extract("රනිල් ගියා බව ඔහු කීවා", &EntityCollection::default());
        assert_eq!(result.strategy, Some(SelectionStrategy::Boundary));
        let triple = &result.triples[0];
        assert_eq!(triple.subject, "ඔහු");
        assert_eq!(triple.predicate, "කීවා");
        let clause = triple.object.as_clause().expect("clause");
        assert_eq!(clause.content_text, "රනිල් ගියා");
        assert_eq!(clause.inner_subject, "රනිල්");
    }

    #[test]
    fn unknown_words_do_not_break_extraction() {
        let result = extractor().extract("නොදන්නා වචන", &EntityCollection::default());
        assert!(result.augmented.iter().all(|t| t.tag.is_unknown()));
        assert!(result.triples.is_empty());
    }
}
