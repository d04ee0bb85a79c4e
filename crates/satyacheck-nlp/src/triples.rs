//! Subject / verb / object selection over chunk trees.
//!
//! Two strategies run in order:
//!
//! - **Boundary**: the sentence contains a reported-speech marker. The main
//!   clause supplies subject and verb; the embedded clause becomes a
//!   structured object.
//! - **Flat**: no marker. Subject, verb and object all come from the single
//!   tree; nothing is emitted without a verb phrase.
//!
//! Subjects prefer a noun phrase containing an entity-tagged leaf, then one
//! containing any proper noun, then the first noun phrase.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chunk::{ChunkTree, Phrase};
use crate::clause::ClauseSplit;
use crate::tags::join_text;

pub const NO_SUBJECT: &str = "N/A_Subject";
pub const NO_OBJECT: &str = "N/A_Object";
pub const NO_INNER_SUBJECT: &str = "N/A_LHS_Subject";
pub const NO_INNER_VERB: &str = "N/A_LHS_Verb";
pub const UNRESOLVED_INNER_OBJECT: &str = "N/A_LHS_Object";
pub const NO_MAIN_SUBJECT: &str = "N/A_RHS_Subject";
pub const NO_MAIN_VERB: &str = "N/A_RHS_Verb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Boundary,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    EventClause,
}

/// An embedded clause used as a triple object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseObject {
    #[serde(rename = "type")]
    pub kind: ClauseKind,
    pub content_text: String,
    pub inner_subject: String,
    pub inner_verb: String,
    pub inner_object: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TripleObject {
    Text(String),
    Clause(ClauseObject),
}

impl TripleObject {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TripleObject::Text(text) => Some(text),
            TripleObject::Clause(_) => None,
        }
    }

    pub fn as_clause(&self) -> Option<&ClauseObject> {
        match self {
            TripleObject::Clause(clause) => Some(clause),
            TripleObject::Text(_) => None,
        }
    }
}

impl fmt::Display for TripleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripleObject::Text(text) => f.write_str(text),
            TripleObject::Clause(clause) => write!(
                f,
                "[{}] ({}, {}, {})",
                clause.content_text, clause.inner_subject, clause.inner_verb, clause.inner_object
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: TripleObject,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

/// Entity-tagged NP, else proper-noun NP, else the first NP.
fn preferred_subject<'a>(nps: &[&'a Phrase]) -> Option<&'a Phrase> {
    nps.iter()
        .find(|np| np.has_entity_leaf())
        .or_else(|| nps.iter().find(|np| np.has_proper_noun_leaf()))
        .or_else(|| nps.first())
        .copied()
}

fn last_verb(tree: &ChunkTree) -> Option<String> {
    tree.verb_phrases().last().map(|vp| vp.text())
}

/// Triple from a split sentence. Always yields exactly one triple.
pub fn select_boundary(split: &ClauseSplit) -> Triple {
    let left_nps = split.left.noun_phrases();
    let inner_subject = preferred_subject(&left_nps)
        .map(Phrase::text)
        .unwrap_or_else(|| NO_INNER_SUBJECT.to_string());
    let inner_verb = last_verb(&split.left).unwrap_or_else(|| NO_INNER_VERB.to_string());

    let clause = ClauseObject {
        kind: ClauseKind::EventClause,
        content_text: join_text(&split.left_tokens).trim().to_string(),
        inner_subject,
        inner_verb,
        inner_object: UNRESOLVED_INNER_OBJECT.to_string(),
    };

    let right_nps = split.right.noun_phrases();
    let subject = preferred_subject(&right_nps)
        .map(Phrase::text)
        .unwrap_or_else(|| NO_MAIN_SUBJECT.to_string());
    let predicate = last_verb(&split.right).unwrap_or_else(|| NO_MAIN_VERB.to_string());

    Triple {
        subject,
        predicate,
        object: TripleObject::Clause(clause),
    }
}

/// Triple from an unsplit sentence; `None` without a verb phrase.
pub fn select_flat(tree: &ChunkTree) -> Option<Triple> {
    let predicate = last_verb(tree)?;
    let nps = tree.noun_phrases();

    let subject = preferred_subject(&nps)
        .map(Phrase::text)
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    // Exclusion is by text: identical NPs elsewhere in the sentence go too.
    let remaining: Vec<&Phrase> = nps.into_iter().filter(|np| np.text() != subject).collect();
    let object = remaining
        .iter()
        .find(|np| np.has_entity_leaf())
        .or_else(|| remaining.first())
        .map(|np| np.text())
        .unwrap_or_else(|| NO_OBJECT.to_string());

    Some(Triple {
        subject,
        predicate,
        object: TripleObject::Text(object),
    })
}

/// Run the boundary strategy when a split exists, else the flat strategy.
pub fn select_triples(
    tree: &ChunkTree,
    split: Option<&ClauseSplit>,
) -> (Option<SelectionStrategy>, Vec<Triple>) {
    if let Some(split) = split {
        return (Some(SelectionStrategy::Boundary), vec![select_boundary(split)]);
    }
    match select_flat(tree) {
        Some(triple) => (Some(SelectionStrategy::Flat), vec![triple]),
        None => (None, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::split_clauses;
    use crate::grammar::ChunkGrammar;
    use crate::tags::TaggedToken;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|(w, t)| TaggedToken::new(*w, *t)).collect()
    }

    fn grammar() -> ChunkGrammar {
        ChunkGrammar::sinhala().expect("grammar")
    }

    #[test]
    fn flat_triple_prefers_entity_subject() {
        let tree = grammar().chunk(&tokens(&[
            ("ජනාධිපති", "NNC"),
            ("රනිල්", "NNP_PERSON"),
            ("ගියා", "VFM"),
        ]));
        let triple = select_flat(&tree).expect("triple");
        assert_eq!(triple.subject, "ජනාධිපති රනිල්");
        assert_eq!(triple.predicate, "ගියා");
        assert_eq!(triple.object, TripleObject::Text(NO_OBJECT.to_string()));
    }

    #[test]
    fn flat_object_skips_subject_and_prefers_entities() {
        let tree = grammar().chunk(&tokens(&[
            ("පොලිසිය", "NNC"),
            ("හමාස්", "NNP_ORG"),
            ("නායකයා", "NNC"),
            ("කොළඹ", "NNP_LOC"),
            ("දී", "POST"),
            ("අත්අඩංගුවට", "VNF"),
            ("ගත්තා", "VFM"),
        ]));
        let triple = select_flat(&tree).expect("triple");
        // ORG rule runs before LOC and absorbs the leading noun.
        assert_eq!(triple.subject, "පොලිසිය හමාස්");
        assert_eq!(triple.object.as_text(), Some("නායකයා කොළඹ දී"));
        assert_eq!(triple.predicate, "අත්අඩංගුවට ගත්තා");
    }

    #[test]
    fn flat_without_verb_emits_nothing() {
        let tree = grammar().chunk(&tokens(&[("ලංකාව", "NNP_LOC")]));
        assert!(select_flat(&tree).is_none());
        assert_eq!(select_triples(&tree, None), (None, Vec::new()));
    }

    #[test]
    fn flat_without_noun_phrases_uses_placeholders() {
        let tree = grammar().chunk(&tokens(&[("ගියා", "VFM")]));
        let triple = select_flat(&tree).expect("triple");
        assert_eq!(triple.subject, NO_SUBJECT);
        assert_eq!(triple.object.as_text(), Some(NO_OBJECT));
    }

    #[test]
    fn last_verb_phrase_is_the_predicate() {
        let tree = grammar().chunk(&tokens(&[
            ("ඔහු", "PRP"),
            ("ගොස්", "VNN"),
            ("කතා", "NNC"),
            ("කළා", "VFM"),
        ]));
        let triple = select_flat(&tree).expect("triple");
        // Tree position decides, not rule order: `<VFM>+` fires before `<VNN>+`.
        assert_eq!(triple.predicate, "කළා");
    }

    #[test]
    fn boundary_triple_wraps_embedded_clause() {
        let g = grammar();
        let input = tokens(&[
            ("හමාස්", "NNP_ORG"),
            ("ප්‍රහාරය", "NNC"),
            ("එල්ල", "NCV"),
            ("කළ", "VP"),
            ("බව", "POST"),
            ("ඊශ්‍රායලය", "NNP_LOC"),
            ("පවසයි", "VFM"),
        ]);
        let split = split_clauses(&g, &input).expect("split");
        let triple = select_boundary(&split);

        assert_eq!(triple.subject, "ඊශ්‍රායලය");
        assert_eq!(triple.predicate, "පවසයි");
        let clause = triple.object.as_clause().expect("clause");
        assert_eq!(clause.content_text, "හමාස් ප්‍රහාරය එල්ල කළ");
        assert_eq!(clause.inner_subject, "හමාස්");
        assert_eq!(clause.inner_verb, "කළ");
        assert_eq!(clause.inner_object, UNRESOLVED_INNER_OBJECT);
    }

    #[test]
    fn boundary_sides_without_phrases_use_side_placeholders() {
        let g = grammar();
        let split = split_clauses(&g, &tokens(&[("බව", "POST")])).expect("split");
        let triple = select_boundary(&split);
        assert_eq!(triple.subject, NO_MAIN_SUBJECT);
        assert_eq!(triple.predicate, NO_MAIN_VERB);
        let clause = triple.object.as_clause().expect("clause");
        assert_eq!(clause.content_text, "");
        assert_eq!(clause.inner_subject, NO_INNER_SUBJECT);
        assert_eq!(clause.inner_verb, NO_INNER_VERB);
    }

    #[test]
    fn clause_object_serializes_with_type_field() {
        let object = TripleObject::Clause(ClauseObject {
            kind: ClauseKind::EventClause,
            content_text: "x".to_string(),
            inner_subject: "s".to_string(),
            inner_verb: "v".to_string(),
            inner_object: UNRESOLVED_INNER_OBJECT.to_string(),
        });
        let json = serde_json::to_value(&object).expect("json");
        assert_eq!(json["type"], "event_clause");
        assert_eq!(json["inner_object"], "N/A_LHS_Object");

        let text = serde_json::to_value(TripleObject::Text("y".to_string())).expect("json");
        assert_eq!(text, serde_json::json!("y"));
    }
}
