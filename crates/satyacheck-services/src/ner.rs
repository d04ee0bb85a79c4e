//! Named-entity recognition client.

use serde::Serialize;

use satyacheck_nlp::{EntityCollection, EntityExtractionError, EntityExtractor};

use crate::http::{decode, JsonClient};
use crate::ServiceError;

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct NerClient {
    http: JsonClient,
    url: String,
}

impl NerClient {
    pub fn new(http: JsonClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn extract(&self, text: &str) -> Result<EntityCollection, ServiceError> {
        let entities: EntityCollection = self.http.post(&self.url, &NerRequest { text })?;
        tracing::debug!(entities = entities.total(), "named entities extracted");
        Ok(entities)
    }
}

/// Decode a NER response; missing categories are empty.
pub fn decode_entities(body: &str) -> Result<EntityCollection, ServiceError> {
    decode("ner", body)
}

impl EntityExtractor for NerClient {
    fn extract_entities(&self, text: &str) -> Result<EntityCollection, EntityExtractionError> {
        self.extract(text).map_err(|err| match err {
            ServiceError::InvalidResponse { message, .. } => EntityExtractionError::InvalidResponse(message),
            other => EntityExtractionError::Service(other.to_string()),
        })
    }
}
