//! HTTP transport layer for the Atlassian adapters.
//!
//! One `reqwest::Client` per transport; it pools connections internally and
//! is safe to share across concurrent invocations. Requests are never
//! retried here.

use crate::config::AtlassianConfig;
use crate::error::{AtlassianError, AtlassianResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// HTTP transport for making authenticated API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<AtlassianConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<AtlassianConfig>) -> AtlassianResult<Self> {
        if config.email.is_empty() || config.api_token.is_empty() {
            return Err(AtlassianError::Config(
                "email and api_token are required".to_string(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AtlassianConfig {
        &self.config
    }

    /// Build a URL under the site from path segments.
    ///
    /// Each segment is percent-encoded, so user-supplied keys and ids cannot
    /// escape their position in the path.
    pub fn url(&self, segments: &[&str]) -> AtlassianResult<Url> {
        let mut url = self.config.base_url.clone();
        if url.cannot_be_a_base() {
            return Err(AtlassianError::Config(format!("Invalid base URL: {}", url)));
        }
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request_builder: RequestBuilder) -> AtlassianResult<Response> {
        let response = request_builder
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Request failed");
        Err(AtlassianError::from_response(status.as_u16(), &body))
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> AtlassianResult<T> {
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> AtlassianResult<T> {
        debug!(url = %url, "GET request with query");

        let response = self.execute(self.client.get(url).query(query)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> AtlassianResult<T> {
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body)).await?;
        let body = response.json().await?;
        Ok(body)
    }
}
