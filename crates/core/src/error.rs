use serde::{Deserialize, Serialize};

/// Result type for tool invocations and backend adapter calls.
pub type ToolResult<T> = Result<T, ToolError>;

/// Closed set of failure kinds a caller can base a retry decision on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The invocation names a tool that is not registered.
    UnknownTool,
    /// Malformed request body, missing parameters or a failed coercion.
    ValidationError,
    /// The backend rejected the configured credentials.
    AuthError,
    /// The backend denied access to the project or space.
    PermissionError,
    /// The backend resource does not exist.
    NotFoundError,
    /// The backend is throttling us.
    RateLimited,
    /// Timeout or transport failure reaching the backend.
    BackendUnavailable,
    /// Anything we could not classify.
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownTool => "UnknownTool",
            Self::ValidationError => "ValidationError",
            Self::AuthError => "AuthError",
            Self::PermissionError => "PermissionError",
            Self::NotFoundError => "NotFoundError",
            Self::RateLimited => "RateLimited",
            Self::BackendUnavailable => "BackendUnavailable",
            Self::Unknown => "Unknown",
        }
    }

    /// HTTP status the protocol layer answers with for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UnknownTool | Self::NotFoundError => 404,
            Self::ValidationError => 400,
            Self::AuthError => 401,
            Self::PermissionError => 403,
            Self::RateLimited => 429,
            Self::BackendUnavailable => 503,
            Self::Unknown => 500,
        }
    }

    /// Whether a caller may reasonably retry the same invocation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::BackendUnavailable)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized failure: every error leaving the dispatcher has this shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorKind::UnknownTool, format!("Unknown tool: {}", name))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthError, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendUnavailable, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }
}
