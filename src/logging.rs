//! Tracing subscriber setup.
//!
//! Everything goes to stderr: on the stdio transport stdout carries JSON-RPC
//! frames and must stay clean.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
        _ => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
    }
    .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(level, format = %config.format, "Logging initialized");
    Ok(())
}

fn default_directives(level: &str) -> String {
    // dependency chatter stays at warn unless RUST_LOG says otherwise
    format!("warn,mcp_apps={level}")
}
