//! Credit balance pre-gate.
//!
//! Balances are owned by an external service; this module only reads them
//! before a paid tool is dispatched.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::webhook::{HttpClient, HttpError, HttpRequest};

#[cfg(test)]
#[path = "balance_tests.rs"]
mod tests;

/// Credit balance as reported by the balance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Credits granted to the user.
    pub available: i64,
    /// Credits already spent.
    pub used: i64,
    /// Credits still spendable.
    pub remaining: i64,
}

impl Balance {
    /// Returns true if `price` credits can be spent.
    #[must_use]
    pub fn covers(&self, price: u32) -> bool {
        self.remaining >= i64::from(price)
    }
}

/// Errors from the balance pre-gate.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The balance service could not be reached.
    #[error("Balance request failed: {0}")]
    Request(#[source] HttpError),

    /// The balance service did not answer in time.
    #[error("Balance request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The balance service answered with a non-2xx status.
    #[error("Balance service returned HTTP {0}")]
    Status(http::StatusCode),

    /// The balance body is not the expected JSON shape.
    #[error("Invalid balance response: {0}")]
    Parse(#[source] serde_json::Error),

    /// The user cannot afford the tool.
    #[error("Insufficient credits: {required} required, {remaining} remaining")]
    Insufficient { required: u32, remaining: i64 },
}

/// Fails with [`BalanceError::Insufficient`] when `balance` cannot cover
/// `price`.
///
/// # Errors
///
/// See above.
pub fn ensure_affordable(balance: &Balance, price: u32) -> Result<(), BalanceError> {
    if balance.covers(price) {
        Ok(())
    } else {
        Err(BalanceError::Insufficient {
            required: price,
            remaining: balance.remaining,
        })
    }
}

/// Reads balances from `<url>?userId=<id>` and gates paid dispatches.
#[derive(Debug)]
pub struct BalanceGate<H> {
    client: H,
    url: url::Url,
    timeout: Duration,
}

impl<H> BalanceGate<H> {
    /// Default time allowed for one balance lookup.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub const fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the lookup timeout.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "timeout must be greater than zero");
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    fn lookup_url(&self, user_id: &str) -> url::Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("userId", user_id);
        url
    }
}

impl<H: HttpClient> BalanceGate<H> {
    /// Fetches the current balance of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`BalanceError`] if the lookup fails or the body is not
    /// a balance.
    pub async fn fetch(&self, user_id: &str) -> Result<Balance, BalanceError> {
        let request = HttpRequest::get(self.lookup_url(user_id));

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| BalanceError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(BalanceError::Request)?;

        if !response.is_success() {
            return Err(BalanceError::Status(response.status));
        }

        serde_json::from_slice(&response.body).map_err(BalanceError::Parse)
    }

    /// Checks that `user_id` can afford a tool costing `price`.
    ///
    /// Free tools pass without a lookup and yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::Insufficient`] when the balance is too low,
    /// or the lookup error.
    pub async fn check(&self, user_id: &str, price: u32) -> Result<Option<Balance>, BalanceError> {
        if price == 0 {
            tracing::debug!(user_id, "Free tool, skipping balance check");
            return Ok(None);
        }

        let balance = self.fetch(user_id).await?;
        tracing::debug!(
            user_id,
            price,
            remaining = balance.remaining,
            "Fetched credit balance"
        );
        ensure_affordable(&balance, price)?;
        Ok(Some(balance))
    }
}
