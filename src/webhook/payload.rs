//! Outgoing webhook payload and its wire encodings.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::pricing::{ToolDescriptor, ToolMeta, descriptor_for};

use super::{FilePart, HttpRequest, MultipartForm, ValidationError};

/// Form field carrying the attachment in multipart mode.
pub const FILE_FIELD: &str = "file";

/// A binary file submitted alongside (or instead of) a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from raw parts.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// The request sent to the automation webhook.
///
/// Built once per submission and never mutated afterwards; all fields are
/// read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPayload {
    message: String,
    tool: ToolDescriptor,
    file: Option<Attachment>,
    user_id: String,
    timestamp: DateTime<Utc>,
}

impl WebhookPayload {
    /// Validates inputs and builds a payload. Performs no I/O.
    ///
    /// The tool descriptor (and therefore the price) comes from
    /// [`descriptor_for`].
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptySubmission`] if there is no non-blank
    ///   message, no file and no tool id
    /// - [`ValidationError::MissingUser`] if `user_id` is blank
    ///
    /// A missing tool id resolves like any unregistered one, at
    /// [`DEFAULT_PRICE`](crate::pricing::DEFAULT_PRICE).
    pub fn build(
        message: Option<&str>,
        tool_id: Option<&str>,
        meta: &ToolMeta,
        file: Option<Attachment>,
        user_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let tool_id = tool_id.map(str::trim).unwrap_or_default();
        let message = message.map(str::trim).unwrap_or_default();
        if message.is_empty() && file.is_none() && tool_id.is_empty() {
            return Err(ValidationError::EmptySubmission);
        }

        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ValidationError::MissingUser);
        }

        Ok(Self {
            message: message.to_string(),
            tool: descriptor_for(tool_id, meta),
            file,
            user_id: user_id.to_string(),
            timestamp,
        })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn tool(&self) -> &ToolDescriptor {
        &self.tool
    }

    #[must_use]
    pub const fn file(&self) -> Option<&Attachment> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp in ISO-8601 with millisecond precision and `Z` suffix.
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// JSON representation used when no file is attached.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "message": self.message,
            "toolId": self.tool.id,
            "tool": self.tool,
            "userId": self.user_id,
            "timestamp": self.timestamp_iso(),
        })
    }

    /// Multipart representation used when a file is attached.
    #[must_use]
    pub fn to_multipart(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("message", self.message.clone())
            .text("toolId", self.tool.id.clone())
            .text("toolName", self.tool.name.clone())
            .text("price", self.tool.price.to_string())
            .text("userId", self.user_id.clone())
            .text("timestamp", self.timestamp_iso());

        match &self.file {
            Some(file) => form.file(FilePart {
                field: FILE_FIELD.to_string(),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            }),
            None => form,
        }
    }

    /// Encodes this payload onto a POST request to `url`.
    ///
    /// Multipart when a file is attached, JSON otherwise.
    #[must_use]
    pub fn to_request(&self, url: url::Url) -> HttpRequest {
        let request = HttpRequest::post(url);
        if self.file.is_some() {
            request.with_multipart(self.to_multipart())
        } else {
            request.with_json(&self.to_json())
        }
    }
}
