//! n8n-dispatch: N8N webhook dispatch client
//!
//! A library for sending dashboard submissions to N8N automation webhooks
//! with timeouts and retries, pricing them per tool, and splitting the
//! AI-generated answer into its three display blocks.

pub mod balance;
pub mod config;
pub mod content;
pub mod pricing;
pub mod time;
pub mod webhook;
