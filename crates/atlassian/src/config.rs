//! Configuration types for the Atlassian adapters.

use std::time::Duration;
use url::Url;

/// Connection settings shared by the Jira and Confluence adapters.
#[derive(Clone)]
pub struct AtlassianConfig {
    /// Site URL, e.g. `https://your-domain.atlassian.net`.
    pub base_url: Url,
    /// Account email used for basic auth.
    pub email: String,
    /// API token used for basic auth.
    pub api_token: String,
    /// Transport-level request timeout.
    pub timeout: Duration,
}

impl AtlassianConfig {
    /// Create a new configuration with the default request timeout.
    pub fn new(base_url: Url, email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            email: email.into(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Base URL as text, without a trailing slash.
    pub fn site(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

impl std::fmt::Debug for AtlassianConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlassianConfig")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
