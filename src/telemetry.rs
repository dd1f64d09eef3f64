//! Logging setup
//!
//! `RUST_LOG` wins over the configured level. Output goes to stderr so
//! `preview` and `render` can print the report on stdout.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;

/// Install the global subscriber. `verbose` raises the default level to debug.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { config.level.as_str() };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(default_level)))
        .context("failed to configure tracing level")?;

    let fmt_layer = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .context("logging already initialized")?;
    Ok(())
}

/// Our crate at `level`; dependencies at `warn`, or at `level` when that is
/// quieter still.
fn default_filter(level: &str) -> String {
    let dependencies = if level == "error" { "error" } else { "warn" };
    format!("{dependencies},weatherdigest={level}")
}
