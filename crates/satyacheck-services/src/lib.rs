//! Clients for the remote services the credibility pipeline depends on.
//!
//! Every client is a blocking JSON POST with the timeout from
//! [`ServiceConfig`]. Failures are [`ServiceError`]s; the NER and similarity
//! clients map them onto the core's seam errors so callers can apply a
//! [`satyacheck_nlp::FailurePolicy`].

pub mod classify;
pub mod config;
pub mod http;
pub mod ner;
pub mod similarity;

pub use classify::{
    ClassifierClient, Classification, NewsClassifier, NewsDetector, NewsDetectorClient,
};
pub use config::{ServiceConfig, ServiceOverrides};
pub use http::JsonClient;
pub use ner::NerClient;
pub use similarity::SimilarityClient;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("{url} returned an invalid payload: {message}")]
    InvalidResponse { url: String, message: String },
    #[error("service configuration: {0}")]
    Config(String),
}

/// All four clients sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClients {
    pub ner: NerClient,
    pub similarity: SimilarityClient,
    pub classifier: ClassifierClient,
    pub detector: NewsDetectorClient,
}

impl ServiceClients {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = JsonClient::new(config.timeout)?;
        Ok(Self {
            ner: NerClient::new(http.clone(), &config.ner_url),
            similarity: SimilarityClient::new(http.clone(), &config.similarity_url),
            classifier: ClassifierClient::new(http.clone(), &config.classifier_url),
            detector: NewsDetectorClient::new(http, &config.news_detector_url),
        })
    }
}
