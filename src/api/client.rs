//! HTTP client for the server's v3 REST API.
//!
//! Built once at provider configure time and shared read-only across
//! lifecycle calls. Authentication is a single long-lived API key sent in
//! the `X-Api-Key` header.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the server API: transport problems and rejected requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, TLS or timeout failure.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// A 4xx/5xx response, with the body text when the server sent one.
    #[error("server returned {status}{}", fmt_body(.body))]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Response body text, possibly empty.
        body: String,
    },
}

fn fmt_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

impl ApiError {
    /// Whether this is a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        )
    }
}

/// Client for one configured server instance.
#[derive(Debug, Clone)]
pub struct RadarrClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
    /// Build a client for the given base URL and API key.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path)
    }

    async fn checked(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, body })
    }

    /// GET a JSON object.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;
        Ok(self.checked(response).await?.json().await?)
    }

    /// POST a JSON body, returning the created object.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(self.checked(response).await?.json().await?)
    }

    /// PUT a JSON body, returning the updated object.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let response = self
            .http
            .put(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(self.checked(response).await?.json().await?)
    }

    /// DELETE, discarding the response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        let response = self
            .http
            .delete(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;
        self.checked(response).await?;
        Ok(())
    }
}
