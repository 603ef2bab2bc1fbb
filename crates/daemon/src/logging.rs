//! Logging setup
//!
//! Every Scout process appends to `{log_dir}/{process}.log` and, when
//! `log.console` is set, also logs to stdout. Both sinks use the same
//! format: pretty, or JSON (`log.format`, overridden by `SCOUT_LOG_FORMAT`).

use crate::config::{LogFormat, LogSettings};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "SCOUT_LOG_FORMAT";
const DEFAULT_FILTER: &str = "scout=debug,info";

/// Env var wins over the configured format
pub fn effective_format(settings: &LogSettings) -> LogFormat {
    match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("pretty") => LogFormat::Pretty,
        _ => settings.format,
    }
}

pub fn log_dir(settings: &LogSettings) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&settings.dir).into_owned())
}

/// Filter layer plus an optional stdout layer and the file layer, in `format`
fn build_subscriber(
    format: LogFormat,
    console: bool,
    env_filter: EnvFilter,
    file_writer: NonBlocking,
) -> Box<dyn Subscriber + Send + Sync> {
    let registry = tracing_subscriber::registry().with(env_filter);

    // Each arm builds its own file layer: the formatter fixes the layer type
    match format {
        LogFormat::Json => Box::new(
            registry
                .with(console.then(|| fmt::layer().json()))
                .with(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_ansi(false)
                        .json(),
                ),
        ),
        LogFormat::Pretty => Box::new(
            registry
                .with(console.then(|| fmt::layer().pretty()))
                .with(fmt::layer().with_writer(file_writer).with_ansi(false)),
        ),
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process, or buffered file output is lost.
pub fn init(process_name: &str, settings: &LogSettings) -> Result<WorkerGuard> {
    let dir = log_dir(settings);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, format!("{process_name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("failed to create env filter")?;

    build_subscriber(
        effective_format(settings),
        settings.console,
        env_filter,
        file_writer,
    )
    .try_init()
    .context("failed to install tracing subscriber")?;

    tracing::debug!(process = %process_name, dir = %dir.display(), "Logging initialized");
    Ok(guard)
}
