//! Composite credibility scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use satyacheck_nlp::{EntityCategory, EntityCollection, FailurePolicy};

use crate::semantic::{unit_interval, with_policy, SemanticSimilarity, SimilarityError};
use crate::similarity::{get_average_similarity, EntityMatch};
use crate::store::{StoreError, TrustedContent, TrustedStore};
use crate::verdict::Verdict;

pub const ENTITY_WEIGHT: f64 = 0.4;
pub const SEMANTIC_WEIGHT: f64 = 0.3;
pub const SOURCE_WEIGHT: f64 = 0.3;

/// A classified article ready for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInput {
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(flatten)]
    pub entities: EntityCollection,
    /// Publisher name.
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub entity_similarity: f64,
    pub semantic_similarity: f64,
    pub source_credibility: f64,
    pub per_entity: BTreeMap<EntityCategory, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub rank: usize,
    pub score: f64,
    pub title: String,
    pub url: String,
    /// Publisher name, else the host part of `url`; empty when neither is known.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityReport {
    /// Composite score rounded to three decimals.
    pub final_score: f64,
    pub result: Verdict,
    pub breakdown: ScoreBreakdown,
    pub semantic_ranking: Vec<RankedRecord>,
    pub entity_matches: BTreeMap<EntityCategory, Vec<EntityMatch>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerOptions {
    pub similarity_policy: FailurePolicy,
}

impl Default for ScorerOptions {
    fn default() -> Self {
        Self {
            similarity_policy: FailurePolicy::Degrade,
        }
    }
}

/// `0.4 * entity + 0.3 * semantic + 0.3 * source`, clamped to `[0, 1]`.
pub fn composite_score(entity: f64, semantic: f64, source: f64) -> f64 {
    (ENTITY_WEIGHT * entity + SEMANTIC_WEIGHT * semantic + SOURCE_WEIGHT * source).clamp(0.0, 1.0)
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// 1.0 when `publisher` names a trusted publisher (trimmed, case-insensitive).
pub fn source_credibility(publisher: &str, trusted: &[String]) -> f64 {
    let publisher = publisher.trim();
    if publisher.is_empty() {
        return 0.0;
    }
    let publisher = publisher.to_lowercase();
    if trusted.iter().any(|t| t.trim().to_lowercase() == publisher) {
        1.0
    } else {
        0.0
    }
}

/// Host of a URL without a leading `www.`.
pub fn source_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

/// Publisher of a trusted record, falling back to its URL host.
pub fn record_source(content: &TrustedContent) -> String {
    let publisher = content.publisher.trim();
    if publisher.is_empty() {
        source_from_url(&content.url)
    } else {
        publisher.to_string()
    }
}

/// Sort by descending score, keeping query order among equal scores, and
/// number the result from 1.
pub fn rank_records(contents: &[TrustedContent], scores: &[f64]) -> Vec<RankedRecord> {
    let mut scored: Vec<(f64, &TrustedContent)> =
        scores.iter().copied().zip(contents.iter()).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, content))| RankedRecord {
            rank: idx + 1,
            score,
            title: content.title.clone(),
            url: content.url.clone(),
            source: record_source(content),
        })
        .collect()
}

pub struct CredibilityScorer<'a> {
    store: &'a dyn TrustedStore,
    similarity: &'a dyn SemanticSimilarity,
    options: ScorerOptions,
}

impl<'a> CredibilityScorer<'a> {
    pub fn new(store: &'a dyn TrustedStore, similarity: &'a dyn SemanticSimilarity) -> Self {
        Self {
            store,
            similarity,
            options: ScorerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScorerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn score(&self, article: &ArticleInput) -> Result<CredibilityReport, ScoringError> {
        let mut per_entity = BTreeMap::new();
        let mut entity_matches = BTreeMap::new();
        let mut weighted_sum = 0.0;
        let mut total_weight = 0usize;

        for category in EntityCategory::ALL {
            let values = article.entities.get(category);
            let verified = if values.is_empty() {
                Vec::new()
            } else {
                self.store.verified_entities(&article.subcategory, category)?
            };
            let (avg, matches) = get_average_similarity(values, &verified);
            weighted_sum += avg * values.len() as f64;
            total_weight += values.len();
            per_entity.insert(category, avg);
            entity_matches.insert(category, matches);
        }
        let entity_similarity = if total_weight > 0 {
            weighted_sum / total_weight as f64
        } else {
            0.0
        };

        let contents = self.store.trusted_contents(&article.subcategory)?;
        let scores = self.similarity_scores(&article.content, &contents)?;
        let semantic_similarity = scores.iter().copied().fold(0.0, f64::max);
        let semantic_ranking = rank_records(&contents, &scores);

        let publishers = self.store.trusted_publishers()?;
        let source_credibility = source_credibility(&article.source, &publishers);

        let composite = composite_score(entity_similarity, semantic_similarity, source_credibility);
        let result = Verdict::from_score(composite);
        tracing::debug!(
            entity_similarity,
            semantic_similarity,
            source_credibility,
            composite,
            verdict = %result,
            trusted_records = contents.len(),
            "scored article"
        );

        Ok(CredibilityReport {
            final_score: round3(composite),
            result,
            breakdown: ScoreBreakdown {
                entity_similarity,
                semantic_similarity,
                source_credibility,
                per_entity,
            },
            semantic_ranking,
            entity_matches,
        })
    }

    /// One similarity query for all trusted records, in store order. The
    /// ranking and the semantic score both derive from this vector.
    fn similarity_scores(&self, content: &str, contents: &[TrustedContent]) -> Result<Vec<f64>, ScoringError> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = contents.iter().map(|c| c.full_text.clone()).collect();
        let expected = texts.len();
        let scores = self
            .similarity
            .similarities(content, &texts)
            .and_then(|scores| {
                if scores.len() == expected {
                    Ok(scores)
                } else {
                    Err(SimilarityError::InvalidResponse(format!(
                        "expected {expected} scores, got {}",
                        scores.len()
                    )))
                }
            });
        let scores = with_policy(scores, self.options.similarity_policy, || vec![0.0; expected])?;
        Ok(scores.into_iter().map(unit_interval).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn composite_uses_fixed_weights() {
        assert_abs_diff_eq!(composite_score(1.0, 1.0, 1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(composite_score(0.5, 0.0, 1.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(composite_score(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn rounding_to_three_decimals() {
        assert_abs_diff_eq!(round3(0.69951), 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(round3(0.1234), 0.123, epsilon = 1e-12);
    }

    #[test]
    fn publisher_match_is_trimmed_and_case_insensitive() {
        let trusted = vec!["Ada Derana".to_string(), "News First".to_string()];
        assert_eq!(source_credibility("  news first ", &trusted), 1.0);
        assert_eq!(source_credibility("Gossip Lanka", &trusted), 0.0);
        assert_eq!(source_credibility("", &trusted), 0.0);
    }

    #[test]
    fn ranking_is_stable_and_descending() {
        let contents = vec![
            TrustedContent::new("a", "A", "https://www.adaderana.lk/news/1"),
            TrustedContent::new("b", "B", "https://sinhala.newsfirst.lk/2025/05/23/x"),
            TrustedContent::new("c", "C", "not a url"),
        ];
        let ranked = rank_records(&contents, &[0.5, 0.9, 0.5]);
        let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["B", "A", "C"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(ranked[0].source, "sinhala.newsfirst.lk");
        assert_eq!(ranked[1].source, "adaderana.lk");
        assert_eq!(ranked[2].source, "");
    }

    #[test]
    fn ranked_source_prefers_the_publisher_name() {
        let named = TrustedContent::new("a", "A", "https://sinhala.newsfirst.lk/1").with_publisher("News First");
        assert_eq!(record_source(&named), "News First");

        let blank = TrustedContent::new("a", "A", "https://www.hirunews.lk/1").with_publisher("  ");
        assert_eq!(record_source(&blank), "hirunews.lk");
    }

    #[test]
    fn article_input_reads_flat_entity_lists() {
        let article: ArticleInput = serde_json::from_str(
            r#"{"content": "x", "subcategory": "cricket", "persons": ["ඇන්ජලෝ මැතිව්ස්"], "source": "News First"}"#,
        )
        .expect("json");
        assert_eq!(article.entities.persons.len(), 1);
        assert!(article.entities.events.is_empty());
        assert_eq!(article.category, "");
    }
}
