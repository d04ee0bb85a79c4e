//! Credibility scoring of news articles against a trusted knowledge base.
//!
//! Three sub-scores feed a weighted composite:
//!
//! - entity similarity: fuzzy matching of the article's named entities
//!   against verified names for its subcategory;
//! - semantic similarity: the best match of the article text against trusted
//!   article texts, from a [`SemanticSimilarity`] implementation;
//! - source credibility: whether the publisher is a trusted one.
//!
//! The knowledge base is reached only through [`TrustedStore`], so scoring is
//! testable with [`InMemoryTrustedStore`].

pub mod fuzzy;
pub mod scorer;
pub mod semantic;
pub mod similarity;
pub mod store;
pub mod verdict;

pub use scorer::{
    composite_score, rank_records, record_source, source_credibility, ArticleInput, CredibilityReport,
    CredibilityScorer, RankedRecord, ScoreBreakdown, ScorerOptions, ScoringError,
};
pub use semantic::{SemanticSimilarity, SimilarityError};
pub use similarity::{get_average_similarity, EntityMatch};
pub use store::{InMemoryTrustedStore, StoreError, TrustedContent, TrustedStore};
pub use verdict::Verdict;
