//! Webhook dispatch client with per-attempt timeout and retries.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::pricing::ToolMeta;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};

use super::normalize::{error_message, normalize};
use super::{
    Attachment, DispatchError, HttpClient, HttpError, HttpRequest, RetryPolicy, ValidationError,
    WebhookPayload, WebhookResult, WebhookSuccess,
};

/// Sends submissions to one automation webhook endpoint.
///
/// The client is an explicit value: the caller injects the transport, and
/// optionally the sleeper used for backoff and the clock used for payload
/// timestamps.
///
/// # Lifecycle of one call
///
/// `Idle → Attempting → Succeeded`, or `Attempting → RetryScheduled →
/// Attempting` after a timeout or network failure while attempts remain,
/// or `Attempting → ExhaustedFailed`. A non-2xx response ends the call
/// immediately, whatever the attempt number.
///
/// # Example
///
/// ```
/// use n8n_dispatch::webhook::{DispatchClient, ReqwestClient};
/// use url::Url;
///
/// let client = DispatchClient::new(
///     ReqwestClient::new(),
///     Some(Url::parse("https://n8n.example.com/webhook/odds").unwrap()),
/// );
/// assert!(client.endpoint().is_some());
/// ```
#[derive(Debug)]
pub struct DispatchClient<H, S = TokioSleeper, C = SystemClock> {
    client: H,
    sleeper: S,
    clock: C,
    endpoint: Option<url::Url>,
    headers: http::HeaderMap,
    retry_policy: RetryPolicy,
}

impl<H> DispatchClient<H, TokioSleeper, SystemClock> {
    /// Creates a client for `endpoint` with the default retry policy.
    ///
    /// A `None` endpoint is allowed; every send then fails with
    /// [`DispatchError::Configuration`] without touching the network.
    #[must_use]
    pub fn new(client: H, endpoint: Option<url::Url>) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            clock: SystemClock,
            endpoint,
            headers: http::HeaderMap::new(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<H, S, C> DispatchClient<H, S, C> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> DispatchClient<H, S2, C> {
        DispatchClient {
            client: self.client,
            sleeper,
            clock: self.clock,
            endpoint: self.endpoint,
            headers: self.headers,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the clock used for payload timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> DispatchClient<H, S, C2> {
        DispatchClient {
            client: self.client,
            sleeper: self.sleeper,
            clock,
            endpoint: self.endpoint,
            headers: self.headers,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets extra headers sent with every attempt.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the retry policy used by [`send`](Self::send) and for backoff.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&url::Url> {
        self.endpoint.as_ref()
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl<H, S, C: Clock> DispatchClient<H, S, C> {
    /// Builds a payload stamped with the current time. Performs no I/O.
    ///
    /// # Errors
    ///
    /// See [`WebhookPayload::build`].
    pub fn build_payload(
        &self,
        message: Option<&str>,
        tool_id: Option<&str>,
        meta: &ToolMeta,
        file: Option<Attachment>,
        user_id: &str,
    ) -> Result<WebhookPayload, ValidationError> {
        let timestamp = DateTime::<Utc>::from(self.clock.now());
        WebhookPayload::build(message, tool_id, meta, file, user_id, timestamp)
    }
}

/// How one attempt ended.
#[derive(Debug)]
enum AttemptOutcome {
    Succeeded(WebhookSuccess),
    /// The attempt never completed; another may be made.
    Retryable(DispatchError),
    /// The server answered, or retrying cannot help.
    Terminal(DispatchError),
}

impl<H: HttpClient, S: Sleeper, C> DispatchClient<H, S, C> {
    /// Sends using the configured retry policy.
    pub async fn send(&self, payload: &WebhookPayload) -> WebhookResult {
        self.send_with_retry(
            payload,
            self.retry_policy.max_retries,
            self.retry_policy.timeout,
        )
        .await
    }

    /// Sends `payload`, making at most `max_retries + 1` sequential attempts.
    ///
    /// Each attempt is cut off after `timeout`; the in-flight request is
    /// dropped when that happens. Timeouts and network failures are retried
    /// after the policy's backoff delay. Any HTTP response that is not 2xx
    /// is returned at once as `HTTP_<status>`.
    ///
    /// Dropping the returned future aborts the current attempt.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    pub async fn send_with_retry(
        &self,
        payload: &WebhookPayload,
        max_retries: u32,
        timeout: Duration,
    ) -> WebhookResult {
        assert!(!timeout.is_zero(), "timeout must be greater than zero");

        let Some(endpoint) = &self.endpoint else {
            tracing::error!(
                tool = %payload.tool().id,
                "No webhook endpoint configured; request not sent"
            );
            return WebhookResult::Failure(DispatchError::Configuration(format!(
                "no endpoint for tool '{}'",
                payload.tool().id
            )));
        };

        let request = self.build_request(endpoint, payload);
        let policy = self.retry_policy.clone().with_max_retries(max_retries);
        let total_attempts = policy.total_attempts();

        let mut attempt = 1;
        loop {
            tracing::debug!(attempt, total_attempts, url = %endpoint, "Sending webhook request");

            match self.attempt(&request, timeout).await {
                AttemptOutcome::Succeeded(success) => {
                    tracing::info!(
                        attempt,
                        processing_time_ms = success.processing_time_ms,
                        "Webhook request succeeded"
                    );
                    return WebhookResult::Success(success);
                }
                AttemptOutcome::Terminal(error) => {
                    tracing::error!(attempt, code = %error.code(), "Webhook request failed: {error}");
                    return WebhookResult::Failure(error);
                }
                AttemptOutcome::Retryable(error) => {
                    if !policy.should_retry(attempt) {
                        tracing::error!(
                            attempts = attempt,
                            code = %error.code(),
                            "Webhook request failed after all attempts: {error}"
                        );
                        return WebhookResult::Failure(error);
                    }

                    let delay = policy.delay_for_retry(attempt - 1);
                    tracing::warn!(
                        attempt,
                        total_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Webhook attempt failed, retrying: {error}"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn build_request(&self, endpoint: &url::Url, payload: &WebhookPayload) -> HttpRequest {
        self.headers
            .iter()
            .fold(payload.to_request(endpoint.clone()), |request, (name, value)| {
                request.with_header(name.clone(), value.clone())
            })
    }

    /// Runs one attempt under `timeout`.
    ///
    /// The timer and the request future are owned by one `timeout` future,
    /// so both are released on every exit path.
    async fn attempt(&self, request: &HttpRequest, timeout: Duration) -> AttemptOutcome {
        let started = tokio::time::Instant::now();
        let outcome = tokio::time::timeout(timeout, self.client.request(request.clone())).await;
        let elapsed = started.elapsed();

        let response = match outcome {
            Err(_) => {
                return AttemptOutcome::Retryable(DispatchError::Timeout {
                    timeout_ms: duration_ms(timeout),
                });
            }
            Ok(Err(error)) => return classify_transport_error(error, timeout),
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            return AttemptOutcome::Terminal(DispatchError::Http {
                status: response.status,
                message: error_message(&response),
            });
        }

        match normalize(&response) {
            Ok(normalized) => AttemptOutcome::Succeeded(WebhookSuccess {
                response: normalized.response,
                processing_time_ms: duration_ms(elapsed),
                tokens: normalized.tokens,
            }),
            Err(error) => AttemptOutcome::Terminal(error),
        }
    }
}

fn classify_transport_error(error: HttpError, timeout: Duration) -> AttemptOutcome {
    let retryable = error.is_retryable();
    let mapped = match error {
        HttpError::Timeout => DispatchError::Timeout {
            timeout_ms: duration_ms(timeout),
        },
        HttpError::InvalidUrl(reason) => DispatchError::Configuration(reason),
        other @ (HttpError::Connection(_) | HttpError::InvalidBody(_)) => {
            DispatchError::Network(other.to_string())
        }
    };

    if retryable {
        AttemptOutcome::Retryable(mapped)
    } else {
        AttemptOutcome::Terminal(mapped)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants another attempt.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // Configuration issues, not transient
            Self::InvalidUrl(_) | Self::InvalidBody(_) => false,
        }
    }
}
