use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{Availability, EventDetail};
use crate::validation::{validate_availability, validate_detail};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed with status {0}")]
    Status(StatusCode),
    #[error("Malformed JSON payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Payload failed validation: {0}")]
    Invalid(String),
}

/// Fetches the detail and availability payloads as programmatic
/// (`X-Requested-With: XMLHttpRequest`) requests.
#[derive(Clone)]
pub struct EventClient {
    client: reqwest::Client,
}

impl EventClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_detail(&self, url: &Url) -> Result<EventDetail, FetchError> {
        let detail = self.fetch_json(url).await?;
        validate_detail(detail)
    }

    pub async fn fetch_availability(&self, url: &Url) -> Result<Availability, FetchError> {
        let availability = self.fetch_json(url).await?;
        validate_availability(availability)
    }
}
