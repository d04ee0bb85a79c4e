//! News classification and news detection clients.

use serde::{Deserialize, Serialize};

use crate::http::{decode, JsonClient};
use crate::ServiceError;

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// Category and subcategory as reported by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
}

impl Classification {
    /// Both labels are present.
    pub fn is_determined(&self) -> bool {
        !self.category.trim().is_empty() && !self.subcategory.trim().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct DetectionResponse {
    #[serde(default)]
    checking: String,
}

pub const NEWS_LABEL: &str = "news";

pub trait NewsClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ServiceError>;
}

pub trait NewsDetector {
    fn is_news(&self, text: &str) -> Result<bool, ServiceError>;
}

pub fn decode_classification(body: &str) -> Result<Classification, ServiceError> {
    decode("classifier", body)
}

pub fn decode_is_news(body: &str) -> Result<bool, ServiceError> {
    decode::<DetectionResponse>("news detector", body).map(|r| is_news_label(&r.checking))
}

fn is_news_label(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(NEWS_LABEL)
}

#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: JsonClient,
    url: String,
}

impl ClassifierClient {
    pub fn new(http: JsonClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl NewsClassifier for ClassifierClient {
    fn classify(&self, text: &str) -> Result<Classification, ServiceError> {
        let classification: Classification = self.http.post(&self.url, &TextRequest { text })?;
        tracing::debug!(
            category = %classification.category,
            subcategory = %classification.subcategory,
            "classified"
        );
        Ok(classification)
    }
}

#[derive(Debug, Clone)]
pub struct NewsDetectorClient {
    http: JsonClient,
    url: String,
}

impl NewsDetectorClient {
    pub fn new(http: JsonClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl NewsDetector for NewsDetectorClient {
    fn is_news(&self, text: &str) -> Result<bool, ServiceError> {
        let resp: DetectionResponse = self.http.post(&self.url, &TextRequest { text })?;
        Ok(is_news_label(&resp.checking))
    }
}
