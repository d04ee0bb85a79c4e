//! Service endpoints and timeout.
//!
//! Precedence for every setting:
//! 1) explicit override (CLI flag)
//! 2) environment variable
//! 3) built-in default

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ServiceError;

pub const NER_URL_ENV: &str = "SATYACHECK_NER_URL";
pub const SIMILARITY_URL_ENV: &str = "SATYACHECK_SIMILARITY_URL";
pub const CLASSIFIER_URL_ENV: &str = "SATYACHECK_CLASSIFIER_URL";
pub const NEWS_DETECTOR_URL_ENV: &str = "SATYACHECK_NEWS_DETECTOR_URL";
pub const HTTP_TIMEOUT_SECS_ENV: &str = "SATYACHECK_HTTP_TIMEOUT_SECS";

pub const DEFAULT_NER_URL: &str = "http://127.0.0.1:8080/ner";
pub const DEFAULT_SIMILARITY_URL: &str = "http://127.0.0.1:5000/similarity";
pub const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:5000/check_category";
pub const DEFAULT_NEWS_DETECTOR_URL: &str = "http://127.0.0.1:5000/check_news";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 90;

/// Values given explicitly, typically from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOverrides {
    pub ner_url: Option<String>,
    pub similarity_url: Option<String>,
    pub classifier_url: Option<String>,
    pub news_detector_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub ner_url: String,
    pub similarity_url: String,
    pub classifier_url: String,
    pub news_detector_url: String,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ner_url: DEFAULT_NER_URL.to_string(),
            similarity_url: DEFAULT_SIMILARITY_URL.to_string(),
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            news_detector_url: DEFAULT_NEWS_DETECTOR_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        }
    }
}

impl ServiceConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &ServiceOverrides) -> Result<Self, ServiceError> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve with an injectable variable lookup.
    pub fn resolve_with(
        overrides: &ServiceOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServiceError> {
        let pick = |explicit: &Option<String>, env: &str, default: &str| -> Result<String, ServiceError> {
            let value = explicit
                .clone()
                .or_else(|| lookup(env).filter(|v| !v.trim().is_empty()))
                .unwrap_or_else(|| default.to_string());
            validate_url(env, value.trim())
        };

        let timeout_secs = match overrides.timeout_secs {
            Some(v) => v,
            None => match lookup(HTTP_TIMEOUT_SECS_ENV) {
                Some(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map_err(|_| {
                    ServiceError::Config(format!(
                        "invalid {HTTP_TIMEOUT_SECS_ENV}={v:?} (expected integer seconds; 0 disables)"
                    ))
                })?,
                _ => DEFAULT_HTTP_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            ner_url: pick(&overrides.ner_url, NER_URL_ENV, DEFAULT_NER_URL)?,
            similarity_url: pick(&overrides.similarity_url, SIMILARITY_URL_ENV, DEFAULT_SIMILARITY_URL)?,
            classifier_url: pick(&overrides.classifier_url, CLASSIFIER_URL_ENV, DEFAULT_CLASSIFIER_URL)?,
            news_detector_url: pick(
                &overrides.news_detector_url,
                NEWS_DETECTOR_URL_ENV,
                DEFAULT_NEWS_DETECTOR_URL,
            )?,
            timeout: if timeout_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(timeout_secs))
            },
        })
    }
}

fn validate_url(setting: &str, value: &str) -> Result<String, ServiceError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ServiceError::Config(format!("invalid {setting}={value:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(ServiceError::Config(format!(
            "invalid {setting}={value:?}: unsupported scheme `{other}`"
        ))),
    }
}
