//! Semantic similarity client.

use serde::{Deserialize, Serialize};

use satyacheck_scoring::{SemanticSimilarity, SimilarityError};

use crate::http::{decode, JsonClient};
use crate::ServiceError;

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    news_text: &'a str,
    trusted_texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SimilarityResponse {
    #[serde(default)]
    max_similarity: f64,
}

#[derive(Debug, Clone)]
pub struct SimilarityClient {
    http: JsonClient,
    url: String,
}

impl SimilarityClient {
    pub fn new(http: JsonClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    fn call(&self, candidate: &str, references: &[String]) -> Result<f64, SimilarityError> {
        let request = SimilarityRequest {
            news_text: candidate,
            trusted_texts: references,
        };
        let resp: SimilarityResponse = self.http.post(&self.url, &request).map_err(to_similarity_error)?;
        Ok(resp.max_similarity)
    }
}

/// Decode a similarity response; a missing score reads as 0.0.
pub fn decode_max_similarity(body: &str) -> Result<f64, ServiceError> {
    decode::<SimilarityResponse>("similarity", body).map(|r| r.max_similarity)
}

fn to_similarity_error(err: ServiceError) -> SimilarityError {
    match err {
        ServiceError::InvalidResponse { message, .. } => SimilarityError::InvalidResponse(message),
        other => SimilarityError::Service(other.to_string()),
    }
}

impl SemanticSimilarity for SimilarityClient {
    /// The service only reports a maximum, so each reference is scored alone.
    fn similarities(&self, candidate: &str, references: &[String]) -> Result<Vec<f64>, SimilarityError> {
        references
            .iter()
            .map(|reference| self.call(candidate, std::slice::from_ref(reference)))
            .collect()
    }

    fn max_similarity(&self, candidate: &str, references: &[String]) -> Result<f64, SimilarityError> {
        if references.is_empty() {
            return Ok(0.0);
        }
        self.call(candidate, references)
    }
}
