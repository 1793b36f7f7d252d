use crate::models::Verbosity;
use anyhow::{Context, Result};
use camino::Utf8Path;
use chrono::Local;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Width of the cron-mode separator line
pub const BANNER_WIDTH: usize = 30;

/// Console and file logging settings for a run.
#[derive(Debug, Clone, Default)]
pub struct LogSettings<'a> {
    pub verbosity: Verbosity,
    pub color: bool,
    pub log_dir: Option<&'a Utf8Path>,
    pub log_prefix: &'a str,
}

/// Setup console logging, with an optional daily rotating file appender.
///
/// The console shows messages without targets so cron mail stays readable.
/// When `log_dir` is set the same events also go to `<log_dir>/<prefix>.<date>`.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file logging
/// active, or `None` when no log directory was requested
pub fn setup_logging(
    settings: &LogSettings<'_>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = EnvFilter::new(settings.verbosity.filter_directive());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(settings.color)
        .with_target(false);

    let (file_layer, guard) = match settings.log_dir {
        Some(log_dir) => {
            ensure_log_dir(log_dir)?;

            let file_appender = rolling::daily(log_dir, settings.log_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::debug!(
        "Logging initialized: level={}, color={}, dir={:?}",
        settings.verbosity.filter_directive(),
        settings.color,
        settings.log_dir
    );

    Ok(guard)
}

/// Create the log directory if it doesn't exist
pub fn ensure_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

/// Separator line written before and after a cron-mode run
pub fn banner() -> String {
    "-".repeat(BANNER_WIDTH)
}

/// "Running cleanup: Fri 2026-10-16 04:00:00" in local time
pub fn run_header() -> String {
    format!("Running cleanup: {}", Local::now().format("%a %Y-%m-%d %H:%M:%S"))
}
