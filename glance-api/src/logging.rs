//! Logging configuration module
//!
//! Console output (plain or JSON) plus an optional daily-rolling JSON file.
//! The file writer is non-blocking; the returned [`WorkerGuard`] must be kept
//! alive for the lifetime of the process or buffered lines are lost.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::GlanceConfig;

const LOG_FILE_PREFIX: &str = "glance-api.log";

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber
pub fn init(config: &GlanceConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let console_layer = if config.json_logs() {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_writer(io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.logging.file_dir {
        Some(dir) => {
            let (writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.logging.level))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        level = %config.logging.level,
        json = config.json_logs(),
        file_dir = ?config.logging.file_dir,
        "Logging initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let filter = env_filter(level);
            assert!(!filter.to_string().is_empty());
        }
    }
}
