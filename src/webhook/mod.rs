//! Webhook layer for dispatching submissions to the automation service.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`], [`MultipartForm`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Payload construction ([`WebhookPayload`], [`Attachment`])
//! - Dispatch with timeout and retries ([`DispatchClient`], [`RetryPolicy`])
//! - Turning response bodies into answer text ([`normalize()`])

mod client;
mod dispatch;
mod error;
mod http;
pub mod normalize;
mod payload;
mod result;
mod retry;

#[cfg(test)]
mod payload_tests;

pub use client::ReqwestClient;
pub use dispatch::{DispatchClient, IsRetryable};
pub use error::{DispatchError, HttpError, ValidationError};
pub use http::{FilePart, HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use normalize::{NormalizedResponse, normalize};
pub use payload::{Attachment, FILE_FIELD, WebhookPayload};
pub use result::{WebhookResult, WebhookSuccess};
pub use retry::RetryPolicy;
