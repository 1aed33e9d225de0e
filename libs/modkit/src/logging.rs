//! Process-wide structured logging setup.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
    /// JSON when stderr is not a terminal, text otherwise.
    #[default]
    Auto,
}

/// `logging` section of the host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `info,storage=debug`.
    pub level: String,
    pub format: LogFormat,
    /// Include file and line of the call site.
    pub with_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Auto,
            with_location: false,
        }
    }
}

impl LoggingConfig {
    /// Filter directive after applying `-v` flags: 1 → debug, 2+ → trace.
    #[must_use]
    pub fn effective_level(&self, verbose: u8) -> &str {
        match verbose {
            0 => &self.level,
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber writing to stderr. `RUST_LOG`, when set, wins over the config.
///
/// # Errors
/// Returns an error if the filter directive is invalid or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.effective_level(verbose))?,
    };

    let use_json = match config.format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stderr().is_terminal(),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    if use_json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_file(config.with_location)
                    .with_line_number(config.with_location),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_location)
                    .with_line_number(config.with_location),
            )
            .try_init()?;
    }

    tracing::debug!(format = ?config.format, json = use_json, "logging initialized");
    Ok(())
}
