use anyhow::{bail, Context, Result};
use atlasgate_atlassian::{AtlassianClient, AtlassianConfig};
use atlasgate_mcp::{Dispatcher, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Connection settings for the Atlassian site.
#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on a single invocation, backend call included.
    #[serde(default = "default_dispatch_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_dispatch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            email: None,
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Values taken from the command line or environment; these win over the
/// configuration file.
#[derive(Debug, Default)]
pub struct BackendOverrides {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            tracing::info!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn apply_overrides(&mut self, overrides: BackendOverrides) {
        let backend = &mut self.backend;
        if overrides.base_url.is_some() {
            backend.base_url = overrides.base_url;
        }
        if overrides.email.is_some() {
            backend.email = overrides.email;
        }
        if overrides.api_token.is_some() {
            backend.api_token = overrides.api_token;
        }
    }

    /// Validated adapter settings. Every missing value is reported at once.
    pub fn atlassian_config(&self) -> Result<AtlassianConfig> {
        let backend = &self.backend;
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let base_url = present(&backend.base_url);
        let email = present(&backend.email);
        let api_token = present(&backend.api_token);

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push("base_url (ATLASSIAN_URL)");
        }
        if email.is_none() {
            missing.push("email (ATLASSIAN_EMAIL)");
        }
        if api_token.is_none() {
            missing.push("api_token (ATLASSIAN_API_TOKEN)");
        }

        let (Some(base_url), Some(email), Some(api_token)) = (base_url, email, api_token) else {
            bail!("Missing backend configuration: {}", missing.join(", "));
        };

        if backend.request_timeout_secs == 0 {
            bail!("backend.request_timeout_secs must be greater than zero");
        }

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid backend base_url: {}", base_url))?;

        let mut config = AtlassianConfig::new(base_url, email, api_token);
        config.timeout = Duration::from_secs(backend.request_timeout_secs);
        Ok(config)
    }

    pub fn dispatch_timeout(&self) -> Result<Duration> {
        if self.dispatch.timeout_secs == 0 {
            bail!("dispatch.timeout_secs must be greater than zero");
        }
        Ok(Duration::from_secs(self.dispatch.timeout_secs))
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let atlassian = config.atlassian_config()?;
        let client =
            AtlassianClient::from_config(atlassian).context("Failed to create Atlassian client")?;

        let dispatcher = Dispatcher::with_default_tools(Arc::new(client.into_context()))
            .context("Failed to register tools")?
            .with_timeout(config.dispatch_timeout()?);

        Ok(Self::from_dispatcher(dispatcher))
    }

    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
