//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 2;

/// Default per-attempt timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 30_000;

/// Default delay before the first retry in milliseconds.
pub const BACKOFF_INITIAL_DELAY_MS: u64 = 1_000;

/// Default upper bound for retry delays in milliseconds.
pub const BACKOFF_MAX_DELAY_MS: u64 = 10_000;

/// Default retry backoff multiplier.
pub const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Default balance lookup timeout in milliseconds.
pub const BALANCE_TIMEOUT_MS: u64 = 10_000;

/// File written by `init` when no output path is given.
pub const INIT_OUTPUT: &str = "n8n-dispatch.toml";

/// Directory under the user config dir that holds the config file.
pub const APP_DIR: &str = "n8n-dispatch";

/// File name looked up in [`APP_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}

/// Default initial retry delay as Duration.
#[must_use]
pub const fn backoff_initial_delay() -> Duration {
    Duration::from_millis(BACKOFF_INITIAL_DELAY_MS)
}

/// Default maximum retry delay as Duration.
#[must_use]
pub const fn backoff_max_delay() -> Duration {
    Duration::from_millis(BACKOFF_MAX_DELAY_MS)
}

/// Default balance lookup timeout as Duration.
#[must_use]
pub const fn balance_timeout() -> Duration {
    Duration::from_millis(BALANCE_TIMEOUT_MS)
}

/// Platform config file path, e.g. `~/.config/n8n-dispatch/config.toml`.
///
/// Returns `None` when the platform has no user config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
