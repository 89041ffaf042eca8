use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

const LOG_FILE_NAME: &str = "ytcomments.log";

fn env_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| Error::custom(format!("invalid log filter {default_level:?}: {e}")))
}

/// Log to stderr so stdout stays reserved for command output.
pub fn init_stderr(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| Error::custom(format!("failed to initialise logging: {e}")))
}

/// Log to a daily-rotated file in `log_dir`; the terminal belongs to the TUI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file(default_level: &str, log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::custom(format!("failed to initialise logging: {e}")))?;

    Ok(guard)
}
