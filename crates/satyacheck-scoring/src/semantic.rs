//! Semantic similarity seam.

use satyacheck_nlp::FailurePolicy;

#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("similarity service failed: {0}")]
    Service(String),
    #[error("similarity service returned an invalid payload: {0}")]
    InvalidResponse(String),
}

/// Scores a candidate text against reference texts, each in `[0, 1]`.
pub trait SemanticSimilarity {
    /// One score per reference, in reference order.
    fn similarities(&self, candidate: &str, references: &[String]) -> Result<Vec<f64>, SimilarityError>;

    /// Maximum over all references; 0.0 when there are none.
    fn max_similarity(&self, candidate: &str, references: &[String]) -> Result<f64, SimilarityError> {
        Ok(self
            .similarities(candidate, references)?
            .into_iter()
            .fold(0.0, f64::max))
    }
}

/// Apply `policy` to a similarity result. Degraded failures become `fallback`.
pub(crate) fn with_policy<T>(
    result: Result<T, SimilarityError>,
    policy: FailurePolicy,
    fallback: impl FnOnce() -> T,
) -> Result<T, SimilarityError> {
    match (result, policy) {
        (Ok(value), _) => Ok(value),
        (Err(err), FailurePolicy::Propagate) => Err(err),
        (Err(err), FailurePolicy::Degrade) => {
            tracing::warn!(error = %err, "semantic similarity unavailable; using fallback score");
            Ok(fallback())
        }
    }
}

/// Clamp a service score into `[0, 1]`; NaN becomes 0.
pub(crate) fn unit_interval(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
