//! Discriminated outcome of a dispatch call.

use serde_json::json;

use super::DispatchError;

/// Successful webhook answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSuccess {
    /// Answer text, ready for [`content::parse`](crate::content::parse).
    pub response: String,
    /// Client-side time from attempt start to response receipt.
    pub processing_time_ms: u64,
    /// Tokens consumed, when the workflow reports them.
    pub tokens: Option<u64>,
}

/// Outcome of [`DispatchClient::send_with_retry`].
///
/// Exactly one variant; expected failures never surface as panics or
/// `Err` values.
///
/// [`DispatchClient::send_with_retry`]: super::DispatchClient::send_with_retry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResult {
    Success(WebhookSuccess),
    Failure(DispatchError),
}

impl WebhookResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success data, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&WebhookSuccess> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`DispatchError`] of a failed dispatch.
    pub fn into_result(self) -> Result<WebhookSuccess, DispatchError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(error) => Err(error),
        }
    }

    /// Renders the `{ success, data | error }` shape the dashboard consumes.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Success(data) => json!({
                "success": true,
                "data": {
                    "response": data.response,
                    "processingTime": data.processing_time_ms,
                    "tokens": data.tokens,
                },
            }),
            Self::Failure(error) => json!({
                "success": false,
                "error": {
                    "code": error.code(),
                    "message": error.to_string(),
                },
            }),
        }
    }
}

impl From<Result<WebhookSuccess, DispatchError>> for WebhookResult {
    fn from(result: Result<WebhookSuccess, DispatchError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failure(error),
        }
    }
}
