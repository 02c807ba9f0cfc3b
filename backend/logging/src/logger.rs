//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional daily-rolling NDJSON
//! files, and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Base name of the rolling log files (`smilecheck.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "smilecheck.log";

/// Build the level filter. `RUST_LOG` wins over `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global structured logger.
///
/// Always logs to stdout; when `log_dir` is set, also writes JSON lines to a
/// daily-rolling file in that directory. Calling this twice is a no-op.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logger(None, "debug");
        init_logger(None, "info");
        tracing::info!("logger initialised twice without panicking");
    }
}
