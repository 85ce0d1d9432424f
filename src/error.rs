//! Error types for icon resolution.

use thiserror::Error;

/// A specialized Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving, fetching or recoloring an icon.
///
/// Every variant maps onto an HTTP-equivalent status via [`ResolveError::status`],
/// so the embedding server can surface it without further translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Malformed specifier, color or query parameters. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown prefix, no backend matched, or the upstream answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// A backend failed or answered with something unusable.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP-equivalent status carried to the caller.
        status: u16,
        /// Human readable cause.
        message: String,
    },

    /// Unsupported content handed to a recolor engine, or a corrupt payload.
    #[error("format error: {0}")]
    Format(String),
}

impl ResolveError {
    /// Creates an [`Upstream`](Self::Upstream) error with the generic 503 status.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: 503,
            message: message.into(),
        }
    }

    /// Error returned when the native renderer address is not configured.
    pub fn renderer_not_configured() -> Self {
        Self::Upstream {
            status: 500,
            message: "native renderer address is not configured".to_string(),
        }
    }

    /// Returns the HTTP-equivalent status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream { status, .. } => *status,
            Self::Format(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::unavailable("upstream request timed out")
        } else if err.is_connect() {
            Self::unavailable(format!("connection failed: {err}"))
        } else {
            Self::unavailable(err.to_string())
        }
    }
}

impl From<image::ImageError> for ResolveError {
    fn from(err: image::ImageError) -> Self {
        Self::Format(err.to_string())
    }
}

impl From<quick_xml::Error> for ResolveError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Format(format!("malformed SVG: {err}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ResolveError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Format(format!("malformed SVG attribute: {err}"))
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<url::ParseError> for ResolveError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidInput(format!("invalid URL: {err}"))
    }
}
