//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::io::Write;

use anyhow::Context;

use super::handlers::RequestCommandHandler;
use super::parser::Cli;
use crate::client::CacheFetcher;
use crate::config::settings::Settings;

/// Execute a CLI command with the given settings, printing to stdout.
///
/// Returns whether the last result envelope reported an error.
pub async fn execute_command(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let fetcher =
        CacheFetcher::from_settings(settings).context("Failed to build the HTTP client")?;
    tracing::debug!(
        transport = fetcher.transport_name(),
        cache_enabled = settings.cache.enabled,
        "Client ready"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let is_error = execute_with(fetcher, cli, settings, &mut out).await?;
    out.flush()?;
    Ok(is_error)
}

/// Execute against an already built client and writer
pub async fn execute_with<W: Write>(
    fetcher: CacheFetcher,
    cli: &Cli,
    settings: &Settings,
    out: &mut W,
) -> anyhow::Result<bool> {
    RequestCommandHandler::new(fetcher, settings.client.default_content_type.clone())
        .execute(&cli.command, out)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clap::Parser;
    use http::Method;

    use super::*;
    use crate::transport::scripted::{ScriptedTransport, json_ok};

    #[tokio::test]
    async fn test_execute_uses_configured_content_type() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(Method::POST, "https://api.test/notes", json_ok("{}"));
        let fetcher = CacheFetcher::with_memory_cache(transport.clone());

        let mut settings = Settings::default();
        settings.client.default_content_type = "text/plain".to_string();
        let cli = Cli::try_parse_from([
            "cache-fetcher",
            "post",
            "https://api.test/notes",
            "--data",
            "hello",
        ])
        .unwrap();

        let mut out = Vec::new();
        let is_error = execute_with(fetcher, &cli, &settings, &mut out).await.unwrap();

        assert!(!is_error);
        assert_eq!(transport.last_request().headers["content-type"], "text/plain");
    }

    #[tokio::test]
    async fn test_execute_reports_last_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetcher = CacheFetcher::with_memory_cache(transport.clone());
        let cli = Cli::try_parse_from(["cache-fetcher", "options", "https://api.test/missing"])
            .unwrap();

        let mut out = Vec::new();
        let is_error = execute_with(fetcher, &cli, &Settings::default(), &mut out)
            .await
            .unwrap();

        assert!(is_error);
        assert_eq!(transport.calls(), 1);
    }
}
