//! HTTP client for the estimator API.
//!
//! Configuration is via environment variables:
//! - `ESTIMATOR_URL` - Base URL (default: `http://localhost:3000/api`)
//! - `ESTIMATOR_API_KEY` - API key for authentication (optional for local)

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::estimation::Calculation;
use crate::models::*;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: API key required or invalid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Clone)]
pub struct EstimatorClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl EstimatorClient {
    pub fn from_env() -> Self {
        let base_url = std::env::var("ESTIMATOR_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let api_key = std::env::var("ESTIMATOR_API_KEY").ok();
        Self::new(base_url, api_key)
    }

    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    pub async fn list_estimates(&self) -> Result<Vec<Estimate>, ClientError> {
        let response = self.request(Method::GET, "/estimates").send().await?;
        self.handle_response(response).await
    }

    pub async fn get_estimate(&self, id: i64) -> Result<Estimate, ClientError> {
        let response = self
            .request(Method::GET, &format!("/estimates/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_estimate(&self, input: &NewEstimate) -> Result<Estimate, ClientError> {
        let response = self
            .request(Method::POST, "/estimates")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn calculate(&self, data: &ProjectData) -> Result<Calculation, ClientError> {
        let response = self
            .request(Method::POST, "/estimates/calculate")
            .json(data)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
