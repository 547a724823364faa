//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook endpoints per tool family
    #[serde(default)]
    pub endpoints: EndpointsSection,

    /// Attempt count and timeout
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Delay between attempts
    #[serde(default)]
    pub backoff: BackoffSection,

    /// Credit balance service
    #[serde(default)]
    pub balance: BalanceSection,
}

/// Webhook endpoints section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsSection {
    /// Webhook URL for analysis tools
    pub analysis: Option<String>,

    /// Webhook URL for vision tools
    pub vision: Option<String>,

    /// Bearer token for the Authorization header
    pub bearer: Option<String>,

    /// Extra HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Dispatch section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// Backoff section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackoffSection {
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: Option<u64>,

    /// Upper bound for any delay in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Growth factor between consecutive delays
    pub multiplier: Option<f64>,
}

/// Balance service section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BalanceSection {
    /// Balance endpoint, queried as `<url>?userId=<id>`
    pub url: Option<String>,

    /// Lookup timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# n8n-dispatch configuration file
#
# Values given on the command line or through environment variables
# take precedence over this file.

[endpoints]
# Webhook for analysis tools (odds-analyzer, match-preview, quick-tip)
# Environment: N8N_ANALYSIS_WEBHOOK_URL
# analysis = "https://n8n.example.com/webhook/analysis"

# Webhook for vision tools (slip-scanner, image-insight)
# Environment: N8N_VISION_WEBHOOK_URL
# vision = "https://n8n.example.com/webhook/vision"

# Bearer token for the Authorization header
# bearer = "your-token-here"

# Extra HTTP headers sent with every attempt
# [endpoints.headers]
# X-Custom-Header = "value"

[dispatch]
# Retries after the first attempt (default: 2)
# max_retries = 2

# Per-attempt timeout in milliseconds (default: 30000)
# timeout_ms = 30000

[backoff]
# Delay before the first retry in milliseconds (default: 1000)
# initial_delay_ms = 1000

# Upper bound for any delay in milliseconds (default: 10000)
# max_delay_ms = 10000

# Growth factor between consecutive delays (default: 2.0)
# multiplier = 2.0

[balance]
# Credit balance endpoint; paid tools are checked before dispatch
# Environment: N8N_BALANCE_URL
# url = "https://app.example.com/api/credits/balance"

# Lookup timeout in milliseconds (default: 10000)
# timeout_ms = 10000
"#
    .to_string()
}
