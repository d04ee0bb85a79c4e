//! Reported-speech clause splitting.

use crate::chunk::ChunkTree;
use crate::grammar::ChunkGrammar;
use crate::tags::TaggedToken;

/// Quotative words that close a reported clause ("that ...").
pub const REPORTED_SPEECH_MARKERS: [&str; 2] = ["බව", "බවයි"];

/// Index of the first marker word tagged as a postposition.
pub fn find_boundary<'a>(tokens: impl IntoIterator<Item = &'a TaggedToken>) -> Option<usize> {
    tokens.into_iter().position(|token| {
        token.tag.is_postposition() && REPORTED_SPEECH_MARKERS.contains(&token.text.as_str())
    })
}

/// A sentence split at its first reported-speech boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSplit {
    pub boundary_index: usize,
    /// Tokens of the embedded (reported) clause, before the marker.
    pub left_tokens: Vec<TaggedToken>,
    pub left: ChunkTree,
    /// Main clause, after the marker.
    pub right: ChunkTree,
}

impl ClauseSplit {
    pub fn right_tokens(&self) -> Vec<&TaggedToken> {
        self.right.leaves()
    }
}

/// Split `tokens` at the first boundary and re-chunk both sides; `None` when
/// the sentence has no boundary.
pub fn split_clauses(grammar: &ChunkGrammar, tokens: &[TaggedToken]) -> Option<ClauseSplit> {
    let boundary_index = find_boundary(tokens)?;
    let left_tokens = tokens[..boundary_index].to_vec();
    let right_tokens = &tokens[boundary_index + 1..];
    tracing::debug!(
        boundary_index,
        left = left_tokens.len(),
        right = right_tokens.len(),
        "reported-speech boundary found"
    );
    Some(ClauseSplit {
        boundary_index,
        left: grammar.chunk(&left_tokens),
        right: grammar.chunk(right_tokens),
        left_tokens,
    })
}
