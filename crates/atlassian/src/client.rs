//! Entry point for building the Jira and Confluence adapters.

use crate::config::AtlassianConfig;
use crate::confluence::ConfluenceClient;
use crate::error::{AtlassianError, AtlassianResult};
use crate::jira::JiraClient;
use crate::transport::HttpTransport;
use atlasgate_core::BackendContext;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Both adapters over one connection pool.
#[derive(Debug, Clone)]
pub struct AtlassianClient {
    config: Arc<AtlassianConfig>,
    jira: JiraClient,
    confluence: ConfluenceClient,
}

impl AtlassianClient {
    /// Create a new client builder.
    pub fn builder() -> AtlassianClientBuilder {
        AtlassianClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: AtlassianConfig) -> AtlassianResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self {
            config,
            jira: JiraClient::new(http.clone()),
            confluence: ConfluenceClient::new(http),
        })
    }

    pub fn config(&self) -> &AtlassianConfig {
        &self.config
    }

    /// Get the Jira adapter.
    pub fn jira(&self) -> &JiraClient {
        &self.jira
    }

    /// Get the Confluence adapter.
    pub fn confluence(&self) -> &ConfluenceClient {
        &self.confluence
    }

    /// Package both adapters as the dispatcher's backend context.
    pub fn into_context(self) -> BackendContext {
        BackendContext::new(
            self.config.site(),
            Arc::new(self.jira),
            Arc::new(self.confluence),
        )
    }
}

/// Builder for creating an AtlassianClient.
pub struct AtlassianClientBuilder {
    base_url: Option<String>,
    email: Option<String>,
    api_token: Option<String>,
    timeout: Duration,
}

impl AtlassianClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            email: None,
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the site URL, e.g. `https://your-domain.atlassian.net`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> AtlassianResult<AtlassianClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| AtlassianError::Config("base_url is required".to_string()))?;
        let email = self
            .email
            .ok_or_else(|| AtlassianError::Config("email is required".to_string()))?;
        let api_token = self
            .api_token
            .ok_or_else(|| AtlassianError::Config("api_token is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        let config = AtlassianConfig {
            base_url,
            email,
            api_token,
            timeout: self.timeout,
        };

        AtlassianClient::from_config(config)
    }
}

impl Default for AtlassianClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
