//! Error types for the Atlassian adapters.

use atlasgate_core::{ErrorKind, ToolError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Result type for adapter operations.
pub type AtlassianResult<T> = Result<T, AtlassianError>;

const MAX_BODY_CHARS: usize = 500;

/// Error types that can occur when talking to Jira or Confluence.
#[derive(Debug, thiserror::Error)]
pub enum AtlassianError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AtlassianError {
    /// Classify this failure into the server's error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    ErrorKind::BackendUnavailable
                } else if let Some(status) = e.status() {
                    kind_for_status(status.as_u16())
                } else {
                    ErrorKind::Unknown
                }
            }
            Self::Api { status, .. } => kind_for_status(*status),
            Self::Config(_) | Self::Json(_) | Self::InvalidUrl(_) => ErrorKind::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.summary())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    default_reason(status).to_string()
                } else {
                    trimmed.chars().take(MAX_BODY_CHARS).collect()
                }
            });

        Self::Api { status, message }
    }
}

impl From<AtlassianError> for ToolError {
    fn from(err: AtlassianError) -> Self {
        let kind = err.kind();
        let message = match &err {
            AtlassianError::Api { status, message } => {
                format!("Atlassian API returned {}: {}", status, message)
            }
            AtlassianError::Json(e) => format!("Invalid response from Atlassian: {}", e),
            other => other.to_string(),
        };
        ToolError::new(kind, message)
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::AuthError,
        403 => ErrorKind::PermissionError,
        404 => ErrorKind::NotFoundError,
        429 => ErrorKind::RateLimited,
        502..=504 => ErrorKind::BackendUnavailable,
        _ => ErrorKind::Unknown,
    }
}

fn default_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
}

/// Error body shapes returned by Jira (`errorMessages`/`errors`) and
/// Confluence (`message`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorResponse {
    fn summary(self) -> Option<String> {
        let mut parts = self.error_messages;
        parts.extend(
            self.errors
                .into_iter()
                .map(|(field, msg)| format!("{}: {}", field, msg)),
        );
        parts.extend(self.message);

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
