//! Configuration layer for n8n-dispatch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line
//! 2. **Environment variables** - `N8N_ANALYSIS_WEBHOOK_URL`,
//!    `N8N_VISION_WEBHOOK_URL`, `N8N_BALANCE_URL`, `N8N_WEBHOOK_BEARER`
//! 3. **TOML config file** - `--config`, or the platform config file
//!    ([`defaults::config_path`]) when present
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! Endpoints are optional. A tool whose family has no endpoint fails at
//! dispatch time with a `CONFIGURATION_ERROR` result.
//!
//! Headers merge: TOML headers are applied first and CLI headers with the
//! same name replace them.
//!
//! # TOML-Only Options
//!
//! Backoff tuning (`backoff.initial_delay_ms`, `backoff.max_delay_ms`,
//! `backoff.multiplier`) and `balance.timeout_ms` are not available via CLI.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, SendArgs};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{BalanceSettings, Endpoints, ValidatedConfig, write_default_config};
