//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// n8n-dispatch: send submissions to N8N automation webhooks
///
/// Builds priced payloads for dashboard tools, delivers them with timeout
/// and retries, and splits AI answers into their three content blocks.
#[derive(Debug, Parser)]
#[command(name = "n8n-dispatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Webhook URL for analysis tools
    #[arg(long = "analysis-url", env = "N8N_ANALYSIS_WEBHOOK_URL", global = true)]
    pub analysis_url: Option<String>,

    /// Webhook URL for vision tools
    #[arg(long = "vision-url", env = "N8N_VISION_WEBHOOK_URL", global = true)]
    pub vision_url: Option<String>,

    /// Credit balance endpoint; enables the balance check before paid tools
    #[arg(long = "balance-url", env = "N8N_BALANCE_URL", global = true)]
    pub balance_url: Option<String>,

    /// Extra webhook headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V", global = true)]
    pub headers: Vec<String>,

    /// Bearer token for the webhook Authorization header
    #[arg(long, env = "N8N_WEBHOOK_BEARER", hide_env_values = true, global = true)]
    pub bearer: Option<String>,

    /// Number of retries after the first attempt
    #[arg(long = "max-retries", global = true)]
    pub max_retries: Option<u32>,

    /// Per-attempt timeout in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    pub timeout_ms: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for n8n-dispatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a submission to the webhook of its tool
    Send(SendArgs),

    /// Split an AI answer into its three content blocks
    Parse {
        /// File holding the answer text (reads stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Print the credit price of a tool
    Price {
        /// Tool id, e.g. odds-analyzer
        tool: String,
    },

    /// List the registered tools
    Tools,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::INIT_OUTPUT)]
        output: PathBuf,
    },
}

/// Arguments of the `send` subcommand.
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Tool id, e.g. odds-analyzer
    #[arg(long)]
    pub tool: String,

    /// Display name for a tool that is not in the registry
    #[arg(long = "tool-name")]
    pub tool_name: Option<String>,

    /// Message text
    #[arg(long, short)]
    pub message: Option<String>,

    /// File to attach (sent as multipart/form-data)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Id of the submitting user
    #[arg(long = "user-id")]
    pub user_id: String,

    /// Print only the result JSON, without the parsed content blocks
    #[arg(long)]
    pub raw: bool,

    /// Skip the credit balance check even when a balance URL is configured
    #[arg(long = "skip-balance")]
    pub skip_balance: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns true if the command talks to remote services and therefore
    /// needs the merged configuration.
    #[must_use]
    pub const fn needs_config(&self) -> bool {
        matches!(self.command, Command::Send(_))
    }
}
