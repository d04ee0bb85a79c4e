//! Chunk trees and the rule-driven chunker.
//!
//! Each rule of a [`ChunkGrammar`] is one pass over the root's children:
//! scanning left to right, the leftmost position where the rule's pattern
//! matches (greedy quantifiers, backtracking on failure) is wrapped into a new
//! phrase node and the scan resumes after it. Matches never overlap and empty
//! matches are skipped. Children already wrapped by an earlier rule are only
//! visible to later rules through `[NP]` / `[VP]` atoms, so tokens consumed
//! into a chunk are not reconsidered by tag patterns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grammar::{Atom, ChunkGrammar, ChunkRule, PatternElement, PhraseKind};
use crate::tags::{join_text, TaggedToken};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub kind: PhraseKind,
    pub children: Vec<ChunkNode>,
}

impl Phrase {
    /// Leaves of this phrase, left to right.
    pub fn leaves(&self) -> Vec<&TaggedToken> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }

    /// Leaf texts joined by single spaces.
    pub fn text(&self) -> String {
        join_text(self.leaves())
    }

    pub fn has_entity_leaf(&self) -> bool {
        self.leaves().iter().any(|t| t.tag.has_entity_suffix())
    }

    pub fn has_proper_noun_leaf(&self) -> bool {
        self.leaves().iter().any(|t| t.tag.is_proper_noun())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkNode {
    Leaf(TaggedToken),
    Phrase(Phrase),
}

impl ChunkNode {
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TaggedToken>) {
        match self {
            ChunkNode::Leaf(token) => out.push(token),
            ChunkNode::Phrase(phrase) => {
                for child in &phrase.children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    fn collect_phrases<'a>(&'a self, kind: PhraseKind, out: &mut Vec<&'a Phrase>) {
        if let ChunkNode::Phrase(phrase) = self {
            if phrase.kind == kind {
                out.push(phrase);
            }
            for child in &phrase.children {
                child.collect_phrases(kind, out);
            }
        }
    }

    fn matches(&self, atom: &Atom) -> bool {
        match (self, atom) {
            (ChunkNode::Leaf(token), Atom::Tags(alternatives)) => {
                alternatives.iter().any(|m| m.matches(&token.tag))
            }
            (ChunkNode::Phrase(phrase), Atom::Phrase(kind)) => phrase.kind == *kind,
            _ => false,
        }
    }
}

impl fmt::Display for ChunkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkNode::Leaf(token) => write!(f, "{token}"),
            ChunkNode::Phrase(phrase) => {
                write!(f, "({}", phrase.kind)?;
                for child in &phrase.children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Shallow constituency tree rooted at an implicit `S` node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkTree {
    pub children: Vec<ChunkNode>,
}

impl ChunkTree {
    pub fn leaves(&self) -> Vec<&TaggedToken> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }

    /// Phrases of `kind` in preorder (an enclosing phrase precedes the
    /// phrases nested inside it).
    pub fn phrases(&self, kind: PhraseKind) -> Vec<&Phrase> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_phrases(kind, &mut out);
        }
        out
    }

    pub fn noun_phrases(&self) -> Vec<&Phrase> {
        self.phrases(PhraseKind::NP)
    }

    pub fn verb_phrases(&self) -> Vec<&Phrase> {
        self.phrases(PhraseKind::VP)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for ChunkTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(S")?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        write!(f, ")")
    }
}

impl ChunkGrammar {
    /// Chunk a tagged sequence. Total over any input, including empty input.
    pub fn chunk(&self, tokens: &[TaggedToken]) -> ChunkTree {
        let mut children: Vec<ChunkNode> = tokens.iter().cloned().map(ChunkNode::Leaf).collect();
        for rule in self.rules() {
            children = apply_rule(rule, children);
        }
        ChunkTree { children }
    }
}

fn apply_rule(rule: &ChunkRule, children: Vec<ChunkNode>) -> Vec<ChunkNode> {
    let spans = find_spans(&rule.pattern, &children);
    if spans.is_empty() {
        return children;
    }
    tracing::trace!(rule = %rule.source, matches = spans.len(), "chunk rule matched");

    let mut out = Vec::with_capacity(children.len());
    let mut spans = spans.into_iter().peekable();
    let mut current: Option<(usize, Vec<ChunkNode>)> = None;

    for (idx, node) in children.into_iter().enumerate() {
        if current.is_none() {
            if let Some(&(start, end)) = spans.peek() {
                if idx == start {
                    spans.next();
                    current = Some((end, Vec::with_capacity(end - start)));
                }
            }
        }
        match current.as_mut() {
            Some((end, group)) => {
                group.push(node);
                if idx + 1 == *end {
                    if let Some((_, group)) = current.take() {
                        out.push(ChunkNode::Phrase(Phrase {
                            kind: rule.label,
                            children: group,
                        }));
                    }
                }
            }
            None => out.push(node),
        }
    }
    out
}

/// Leftmost non-overlapping, non-empty match spans `[start, end)`.
fn find_spans(pattern: &[PatternElement], nodes: &[ChunkNode]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < nodes.len() {
        match match_at(pattern, nodes, pos) {
            Some(end) if end > pos => {
                spans.push((pos, end));
                pos = end;
            }
            _ => pos += 1,
        }
    }
    spans
}

/// Greedy match of `pattern` starting at `pos`; returns the end index of the
/// first successful assignment, trying longer repetitions first.
fn match_at(pattern: &[PatternElement], nodes: &[ChunkNode], pos: usize) -> Option<usize> {
    let Some((element, rest)) = pattern.split_first() else {
        return Some(pos);
    };
    let (min, max) = element.repeat.bounds();
    let available = nodes[pos..]
        .iter()
        .take(max)
        .take_while(|node| node.matches(&element.atom))
        .count();
    if available < min {
        return None;
    }
    (min..=available)
        .rev()
        .find_map(|count| match_at(rest, nodes, pos + count))
}
