//! File logging for the console.
//!
//! The terminal is owned by the UI, so logs go to
//! `<data dir>/mcpdeck/logs/mcpdeck-tui.log`. The level is controlled by the
//! `MCPDECK_LOG` environment variable.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE: &str = "mcpdeck-tui.log";

/// Initialize file logging. Returns the log directory.
pub fn init() -> anyhow::Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);

    let env_filter = EnvFilter::try_from_env("MCPDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("mcpdeck=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::info!(log_dir = %log_dir.display(), "mcpdeck console starting");
    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("mcpdeck").join("logs")
}
