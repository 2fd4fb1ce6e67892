// Logging setup
// stdout carries command output, so every log line goes to stderr

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// `json` or `pretty` (default)
const LOG_FORMAT_ENV: &str = "JOBSCOUT_LOG_FORMAT";

/// Directory for an additional daily-rotated JSON log
const LOG_DIR_ENV: &str = "JOBSCOUT_LOG_DIR";

const LOG_FILE_PREFIX: &str = "jobscout.log";

/// Used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "jobscout=info";

/// Install the global subscriber.
///
/// The returned guard flushes the file log on drop; keep it alive for the
/// whole run.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    let stderr_layer = match log_format.as_str() {
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    let (file_layer, guard) = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
