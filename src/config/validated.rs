//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use url::Url;

use crate::pricing::ToolFamily;
use crate::webhook::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Webhook endpoint per tool family.
///
/// A missing endpoint is not a configuration error: dispatching to it
/// yields a `CONFIGURATION_ERROR` result instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub analysis: Option<Url>,
    pub vision: Option<Url>,
}

impl Endpoints {
    /// Returns the endpoint that serves `family`.
    #[must_use]
    pub const fn for_family(&self, family: ToolFamily) -> Option<&Url> {
        match family {
            ToolFamily::Analysis => self.analysis.as_ref(),
            ToolFamily::Vision => self.vision.as_ref(),
        }
    }
}

/// Balance service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSettings {
    pub url: Url,
    pub timeout: Duration,
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Webhook endpoints
    pub endpoints: Endpoints,

    /// Extra headers sent with every webhook attempt
    pub headers: HeaderMap,

    /// Attempt count, per-attempt timeout and backoff
    pub retry_policy: RetryPolicy,

    /// Balance pre-gate; disabled when `None`
    pub balance: Option<BalanceSettings>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(url: Option<&Url>) -> String {
            url.map_or_else(|| "none".to_string(), ToString::to_string)
        }

        write!(
            f,
            "Config {{ analysis: {}, vision: {}, balance: {}, retries: {}, timeout: {}ms, \
             backoff: {}ms..{}ms x{}, headers: {} }}",
            show(self.endpoints.analysis.as_ref()),
            show(self.endpoints.vision.as_ref()),
            show(self.balance.as_ref().map(|b| &b.url)),
            self.retry_policy.max_retries,
            self.retry_policy.timeout.as_millis(),
            self.retry_policy.initial_delay.as_millis(),
            self.retry_policy.max_delay.as_millis(),
            self.retry_policy.multiplier,
            self.headers.len(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// TOML config values, which take precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A URL is invalid or not http(s)
    /// - A timeout is zero
    /// - Backoff settings are inconsistent
    /// - Header format is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let endpoints = Endpoints {
            analysis: resolve_url(
                field::ANALYSIS_URL,
                cli.analysis_url.as_deref(),
                toml.and_then(|t| t.endpoints.analysis.as_deref()),
            )?,
            vision: resolve_url(
                field::VISION_URL,
                cli.vision_url.as_deref(),
                toml.and_then(|t| t.endpoints.vision.as_deref()),
            )?,
        };

        let headers = Self::resolve_headers(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;
        let balance = Self::resolve_balance(cli, toml)?;

        Ok(Self {
            endpoints,
            headers,
            retry_policy,
            balance,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, that file must exist. Otherwise the platform
    /// config file ([`defaults::config_path`]) is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else if let Some(path) = defaults::config_path().filter(|p| p.is_file()) {
            tracing::debug!(path = %path.display(), "Using platform config file");
            Some(TomlConfig::load(&path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.endpoints.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.endpoints.bearer.as_deref()));

        if let Some(token) = bearer {
            let auth_value = format!("Bearer {token}");
            let mut header_value = parse_header_value("Authorization", &auth_value)?;
            header_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let dispatch = toml.map(|t| &t.dispatch);
        let backoff = toml.map(|t| &t.backoff);

        // Priority: CLI explicit > TOML > default
        let max_retries = cli
            .max_retries
            .or_else(|| dispatch.and_then(|d| d.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        let timeout_ms = cli
            .timeout_ms
            .or_else(|| dispatch.and_then(|d| d.timeout_ms))
            .unwrap_or(defaults::TIMEOUT_MS);

        let initial_delay_ms = backoff
            .and_then(|b| b.initial_delay_ms)
            .unwrap_or(defaults::BACKOFF_INITIAL_DELAY_MS);

        let max_delay_ms = backoff
            .and_then(|b| b.max_delay_ms)
            .unwrap_or(defaults::BACKOFF_MAX_DELAY_MS);

        let multiplier = backoff
            .and_then(|b| b.multiplier)
            .unwrap_or(defaults::BACKOFF_MULTIPLIER);

        let timeout = positive_millis(field::TIMEOUT, timeout_ms)?;

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidBackoff(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_ms < initial_delay_ms {
            return Err(ConfigError::InvalidBackoff(format!(
                "max_delay_ms ({max_delay_ms}) must be >= initial_delay_ms ({initial_delay_ms})"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_timeout(timeout)
            .with_initial_delay(Duration::from_millis(initial_delay_ms))
            .with_max_delay(Duration::from_millis(max_delay_ms))
            .with_multiplier(multiplier))
    }

    fn resolve_balance(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<BalanceSettings>, ConfigError> {
        let section = toml.map(|t| &t.balance);

        let Some(url) = resolve_url(
            field::BALANCE_URL,
            cli.balance_url.as_deref(),
            section.and_then(|b| b.url.as_deref()),
        )?
        else {
            return Ok(None);
        };

        let timeout_ms = section
            .and_then(|b| b.timeout_ms)
            .unwrap_or(defaults::BALANCE_TIMEOUT_MS);

        Ok(Some(BalanceSettings {
            url,
            timeout: positive_millis(field::BALANCE_TIMEOUT, timeout_ms)?,
        }))
    }
}

/// Writes the default configuration template to a file.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |e: std::io::Error| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(write_error)
}

// Helper functions

/// Picks the CLI value over the TOML value and validates it as an http(s) URL.
///
/// Blank values count as unset so an empty environment variable does not
/// shadow the config file.
fn resolve_url(
    field: &'static str,
    cli: Option<&str>,
    toml: Option<&str>,
) -> Result<Option<Url>, ConfigError> {
    let Some(raw) = cli
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| toml.map(str::trim).filter(|s| !s.is_empty()))
    else {
        return Ok(None);
    };

    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn positive_millis(field: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    if millis == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
