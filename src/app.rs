//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use n8n_dispatch::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid settings, missing endpoint, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - dispatch failure, balance rejection, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            eprintln!("\nRun 'n8n-dispatch init' to generate a configuration template.");
        }
        ConfigError::InvalidUrl { .. } => {
            eprintln!(
                "\nCheck N8N_ANALYSIS_WEBHOOK_URL, N8N_VISION_WEBHOOK_URL and N8N_BALANCE_URL \
                 as well as the config file."
            );
        }
        _ => {}
    }
}

/// Prints the hint for a send that had no endpoint.
pub fn print_endpoint_hint() {
    eprintln!(
        "\nSet --analysis-url / --vision-url, the N8N_*_WEBHOOK_URL variables, \
         or [endpoints] in the config file."
    );
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries command output.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
