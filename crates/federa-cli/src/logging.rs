//! Logging setup for the checker binary.
//!
//! Logs go to stderr; stdout carries only reports.

use anyhow::Context;
use std::io;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::CheckConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &CheckConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let json_layer = config.log_json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(io::stderr)
    });
    let plain_layer = (!config.log_json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(plain_layer)
        .try_init()
        .context("Failed to set global default subscriber")?;

    debug!(
        log_format = if config.log_json { "json" } else { "plain" },
        "Logging initialized"
    );
    Ok(())
}
