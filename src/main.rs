//! n8n-dispatch: N8N webhook dispatch client
//!
//! Entry point for the n8n-dispatch application.

use n8n_dispatch::config::{Cli, Command, SendArgs, ValidatedConfig, write_default_config};
use n8n_dispatch::webhook::ReqwestClient;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, print_endpoint_hint, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    let outcome = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Parse { input } => run::parse(input.as_deref(), std::io::stdin(), &mut stdout),
        Command::Price { tool } => run::price(tool, &mut stdout),
        Command::Tools => run::tools(&mut stdout),
        Command::Send(args) => {
            // Load and validate configuration
            let config = match ValidatedConfig::load(&cli) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    print_config_hint(&e);
                    return exit_code::CONFIG_ERROR;
                }
            };
            tracing::debug!("{config}");

            run_send(&config, args, &mut stdout)
        }
    };

    match outcome {
        Ok(()) => exit_code::SUCCESS,
        Err(e) if e.is_configuration() => {
            eprintln!("Error: {e}");
            print_endpoint_hint();
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the `send` subcommand on a fresh runtime.
///
/// Excluded from coverage - requires async runtime and network.
#[cfg(not(tarpaulin_include))]
fn run_send(
    config: &ValidatedConfig,
    args: &SendArgs,
    out: &mut impl std::io::Write,
) -> Result<(), RunError> {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    runtime.block_on(run::send(ReqwestClient::new(), config, args, out))
}
