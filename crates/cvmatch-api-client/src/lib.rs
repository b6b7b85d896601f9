//! HTTP client for the résumé analysis service.
//!
//! Provides a minimal client with generic GET / multipart POST helpers and the
//! [`AnalysisService`](cvmatch_core::AnalysisService) implementation used by
//! the workflow controller. The service needs no authentication.

pub mod api;

use std::time::Duration;

use anyhow::{Context, Result};
use cvmatch_core::{ClientConfig, ServiceError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// HTTP client for the analysis service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request without a body. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ServiceError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "POST multipart");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(err.to_string())
    }
}

/// Check the status, then parse the body. A body that fails to parse is a
/// malformed response, not a transport failure.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!(status = status.as_u16(), %body, "Request rejected");
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await.map_err(transport_error)?;
    let body = serde_json::from_str(&text)?;
    Ok(body)
}
