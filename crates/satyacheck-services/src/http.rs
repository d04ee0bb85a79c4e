//! Blocking JSON-over-HTTP transport shared by the service clients.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::ServiceError;

#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::blocking::Client,
}

impl JsonClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// POST `body` as JSON and decode the response body.
    pub fn post<B, R>(&self, url: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(%url, "calling service");
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|source| ServiceError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        let text = resp.text().map_err(|source| ServiceError::Http {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        decode(url, &text)
    }
}

/// Decode a JSON response body.
pub fn decode<R: DeserializeOwned>(url: &str, text: &str) -> Result<R, ServiceError> {
    serde_json::from_str(text).map_err(|e| ServiceError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
