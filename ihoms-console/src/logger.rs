//! Logging setup
//!
//! Human-readable output on stderr, so stdout stays clean for command
//! output. When a log directory is configured and exists, JSON lines are
//! also written to a daily rotating file there.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "ihoms_client=info,ihoms_console=info";

pub fn init_logger(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = log_dir.filter(|dir| dir.is_dir()).map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "ihoms-console");
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::sync::Mutex::new(appender))
    });
    let file_enabled = file_layer.is_some();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    match log_dir {
        Some(dir) if !file_enabled => {
            tracing::warn!(dir = %dir.display(), "Log directory does not exist, file logging disabled")
        }
        Some(dir) => tracing::debug!(dir = %dir.display(), "File logging enabled"),
        None => {}
    }
    Ok(())
}
