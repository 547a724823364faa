//! Error types for webhook dispatch.

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out inside the transport.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded (e.g. a malformed MIME type).
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// Rejected inputs to [`DispatchClient::build_payload`].
///
/// [`DispatchClient::build_payload`]: super::DispatchClient::build_payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No message, no file and no tool id were supplied.
    #[error("A message, a file or a tool id is required")]
    EmptySubmission,

    /// The user id is empty.
    #[error("A user id is required")]
    MissingUser,
}

/// Why a dispatch call failed.
///
/// Carried by [`WebhookResult::Failure`]; every variant maps to a stable
/// string code via [`DispatchError::code`].
///
/// [`WebhookResult::Failure`]: super::WebhookResult::Failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No endpoint is configured for this tool family.
    #[error("Webhook endpoint is not configured: {0}")]
    Configuration(String),

    /// The attempt did not complete within the per-attempt timeout.
    #[error("Webhook request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that expired
        timeout_ms: u64,
    },

    /// The attempt failed before a response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// Response status
        status: http::StatusCode,
        /// Server-provided message, or the canonical status text
        message: String,
    },

    /// A 2xx response body could not be interpreted.
    #[error("Failed to parse webhook response: {0}")]
    Parse(String),
}

impl DispatchError {
    /// Stable machine-readable code (`TIMEOUT`, `HTTP_400`, ...).
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR".to_string(),
            Self::Timeout { .. } => "TIMEOUT".to_string(),
            Self::Network(_) => "NETWORK_ERROR".to_string(),
            Self::Http { status, .. } => format!("HTTP_{}", status.as_u16()),
            Self::Parse(_) => "PARSE_ERROR".to_string(),
        }
    }
}
