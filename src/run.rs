//! Subcommand execution.
//!
//! Every command writes its result to the given writer so the binary can
//! pass stdout and tests can pass a buffer.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use n8n_dispatch::balance::{BalanceError, BalanceGate};
use n8n_dispatch::config::{SendArgs, ValidatedConfig};
use n8n_dispatch::content;
use n8n_dispatch::pricing::{self, ToolFamily, ToolId, ToolMeta};
use n8n_dispatch::webhook::{
    Attachment, DispatchClient, DispatchError, HttpClient, ValidationError, WebhookResult,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The submission was rejected before sending.
    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),

    /// The attachment could not be read.
    #[error("Failed to read attachment '{}': {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text to parse could not be read.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    /// The balance pre-gate rejected or failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// The webhook call failed.
    #[error("Dispatch failed [{code}]: {0}", code = .0.code())]
    Dispatch(#[source] DispatchError),

    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// Returns true if the failure stems from missing or invalid settings
    /// rather than from the remote side.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Dispatch(DispatchError::Configuration(_)))
    }
}

/// Routes a tool to its family's endpoint.
///
/// Tools outside the registry go to the analysis webhook.
fn family_of(tool_id: &str) -> ToolFamily {
    tool_id
        .parse::<ToolId>()
        .map_or(ToolFamily::Analysis, ToolId::family)
}

/// Executes `send`: build, gate, dispatch, render.
///
/// The result JSON is written even when the dispatch fails; the failure
/// is then also returned so the caller can pick the exit code.
///
/// # Errors
///
/// Returns a [`RunError`] for invalid input, a rejected balance check, a
/// failed dispatch, or an output failure.
pub async fn send<H, W>(
    http: H,
    config: &ValidatedConfig,
    args: &SendArgs,
    out: &mut W,
) -> Result<(), RunError>
where
    H: HttpClient + Clone,
    W: Write,
{
    let meta = ToolMeta {
        name: args.tool_name.clone(),
        gradient_tag: None,
    };

    let attachment = args
        .file
        .as_deref()
        .map(|path| {
            Attachment::from_path(path).map_err(|source| RunError::Attachment {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;

    let family = family_of(&args.tool);
    let endpoint = config.endpoints.for_family(family).cloned();
    if endpoint.is_none() {
        tracing::warn!(%family, "No webhook endpoint configured for tool family");
    }

    let dispatcher = DispatchClient::new(http.clone(), endpoint)
        .with_headers(config.headers.clone())
        .with_retry_policy(config.retry_policy.clone());

    let payload = dispatcher.build_payload(
        args.message.as_deref(),
        Some(&args.tool),
        &meta,
        attachment,
        &args.user_id,
    )?;

    match &config.balance {
        Some(settings) if !args.skip_balance => {
            BalanceGate::new(http, settings.url.clone())
                .with_timeout(settings.timeout)
                .check(payload.user_id(), payload.tool().price)
                .await?;
        }
        _ => tracing::debug!("Balance check disabled"),
    }

    tracing::info!(
        tool = %payload.tool().id,
        price = payload.tool().price,
        attachment = payload.file().is_some(),
        "Dispatching submission"
    );
    let result = dispatcher.send(&payload).await;

    write_json(out, &render_result(&result, !args.raw))?;
    result.into_result().map(|_| ()).map_err(RunError::Dispatch)
}

/// Result JSON, with the parsed content blocks added on success.
fn render_result(result: &WebhookResult, with_blocks: bool) -> serde_json::Value {
    let mut json = result.to_json();
    if let (true, Some(success)) = (with_blocks, result.success()) {
        json["blocks"] = serde_json::json!(content::parse(&success.response));
    }
    json
}

/// Executes `parse`: reads the answer from `input` or `stdin`.
///
/// # Errors
///
/// Returns [`RunError::Input`] if the text cannot be read.
pub fn parse<R: Read, W: Write>(
    input: Option<&Path>,
    stdin: R,
    out: &mut W,
) -> Result<(), RunError> {
    let text = match input {
        Some(path) => std::fs::read(path).map_err(RunError::Input)?,
        None => read_all(stdin)?,
    };
    let text = String::from_utf8_lossy(&text);

    let blocks = content::parse(&text);
    if blocks.is_empty() {
        tracing::warn!("No content block headings found");
    }
    write_json(out, &serde_json::json!(blocks))
}

fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>, RunError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(RunError::Input)?;
    Ok(buf)
}

/// Executes `price`.
///
/// # Errors
///
/// Returns [`RunError::Output`] if writing fails.
pub fn price<W: Write>(tool_id: &str, out: &mut W) -> Result<(), RunError> {
    if tool_id.parse::<ToolId>().is_err() {
        tracing::warn!(tool_id, "Unknown tool, using default price");
    }
    writeln!(out, "{}", pricing::price_of(tool_id))?;
    Ok(())
}

/// Executes `tools`.
///
/// # Errors
///
/// Returns [`RunError::Output`] if writing fails.
pub fn tools<W: Write>(out: &mut W) -> Result<(), RunError> {
    writeln!(out, "{:<16} {:>5}  {:<8}  NAME", "ID", "PRICE", "FAMILY")?;
    for tool in ToolId::ALL {
        writeln!(
            out,
            "{:<16} {:>5}  {:<8}  {}",
            tool.as_str(),
            tool.price(),
            tool.family().as_str(),
            tool.name()
        )?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, value: &serde_json::Value) -> Result<(), RunError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
